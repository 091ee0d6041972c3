pub mod source;

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    thread,
    time::Duration,
};

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use crate::{
    agg::table::AggregationTable,
    error::ProfileError,
    model::{
        cli::RunConfig,
        label::LabelSet,
        record::{RawRecord, Record},
        session::Session,
    },
    parse::{Parsed, parse_record, tokenize},
    pipeline::source::LineSource,
    ui,
};

/// How often idle stages look at the file and the cancellation flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One raw line tagged with its 1-based position in the file.
#[derive(Debug)]
struct SourceLine {
    number: u64,
    text: String,
}

/// A parsed record still carrying its raw fields for the inspector pane.
#[derive(Debug)]
struct ParsedLine {
    record: Record,
    raw: RawRecord,
}

/// Shared stop flag observed by every stage.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The first fatal error wins; later ones are dropped.
#[derive(Debug, Default)]
struct FatalSlot(Mutex<Option<ProfileError>>);

impl FatalSlot {
    fn set(&self, err: ProfileError) {
        let mut slot = self.0.lock().unwrap();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    fn take(&self) -> Option<ProfileError> {
        self.0.lock().unwrap().take()
    }
}

/// Sequential whole-file profile: parse, aggregate, render one table.
pub fn run_batch(config: &RunConfig, labels: &LabelSet) -> Result<(), ProfileError> {
    let text = std::fs::read_to_string(&config.file)
        .with_context(|| format!("read {}", config.file.display()))
        .map_err(ProfileError::Input)?;

    let mut table = AggregationTable::new();
    for (idx, line) in text.lines().enumerate() {
        match parse_record(&tokenize(line), labels) {
            Ok(Parsed::Accepted(record)) => table.upsert(&record),
            Ok(Parsed::Skipped) => {}
            Err(missing) => {
                return Err(ProfileError::MissingField {
                    label: missing.label,
                    line: idx as u64 + 1,
                });
            }
        }
    }

    ui::report::print_table(&table, config.sort, config.expand);
    Ok(())
}

/// Follow the file and run the live dashboard until cancelled.
pub fn run_tail(config: &RunConfig, labels: &LabelSet) -> Result<(), ProfileError> {
    let session = Arc::new(Mutex::new(Session::new(config.limit)));
    IngestionPipeline::new(config.clone(), labels.clone(), session).run()
}

/// Coordinates the source, the parser pool, the aggregator and the two
/// dashboard stages under one cancellation token.
pub struct IngestionPipeline {
    config: RunConfig,
    labels: LabelSet,
    session: Arc<Mutex<Session>>,
    cancel: CancelToken,
    fatal: FatalSlot,
    /// Lines handed to the parser pool so far; the dashboard derives the
    /// ignored-line counter from it.
    lines_read: AtomicU64,
}

impl IngestionPipeline {
    pub fn new(config: RunConfig, labels: LabelSet, session: Arc<Mutex<Session>>) -> Self {
        Self {
            config,
            labels,
            session,
            cancel: CancelToken::new(),
            fatal: FatalSlot::default(),
            lines_read: AtomicU64::new(0),
        }
    }

    pub fn run(self) -> Result<(), ProfileError> {
        let mut terminal = match ui::dashboard::setup_terminal() {
            Ok(t) => t,
            Err(err) => return Err(ProfileError::Render(err)),
        };

        self.drive(&mut terminal);

        ui::dashboard::restore_terminal();

        match self.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Spawn every stage and block until all of them have unwound. Stages
    /// talk through bounded queues; a full record queue throttles parsing,
    /// which throttles the source.
    fn drive(&self, terminal: &mut ui::dashboard::Term) {
        let (line_tx, line_rx) = bounded::<SourceLine>(self.config.workers * 4);
        let (record_tx, record_rx) = bounded::<ParsedLine>(self.config.workers * 4);
        let (redraw_tx, redraw_rx) = bounded::<()>(1);

        // paint the empty dashboard before the first record lands
        let _ = redraw_tx.try_send(());

        thread::scope(|scope| {
            scope.spawn(move || self.run_source(line_tx));

            for _ in 0..self.config.workers {
                let line_rx = line_rx.clone();
                let record_tx = record_tx.clone();
                scope.spawn(move || self.run_worker(line_rx, record_tx));
            }
            drop(line_rx);
            drop(record_tx);

            let agg_redraw = redraw_tx.clone();
            scope.spawn(move || self.run_aggregator(record_rx, agg_redraw));

            scope.spawn(move || self.run_renderer(terminal, redraw_rx));

            self.run_input(redraw_tx);
        });
    }

    /// Stage 1: emit lines in file order until cancelled.
    fn run_source(&self, line_tx: Sender<SourceLine>) {
        let mut source = match LineSource::open(&self.config.file) {
            Ok(s) => s,
            Err(err) => {
                self.fail(ProfileError::Input(err));
                return;
            }
        };

        let mut number = 0u64;
        while !self.cancel.is_cancelled() {
            match source.next_line() {
                Ok(Some(text)) => {
                    number += 1;
                    if line_tx.send(SourceLine { number, text }).is_err() {
                        break;
                    }
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(err) => {
                    self.fail(ProfileError::Input(err));
                    break;
                }
            }
        }
    }

    /// Stage 2: one of N pool workers. A missing required field is fatal for
    /// the whole run; a skip is dropped without a trace beyond the counter.
    fn run_worker(&self, line_rx: Receiver<SourceLine>, record_tx: Sender<ParsedLine>) {
        while let Ok(line) = line_rx.recv() {
            if self.cancel.is_cancelled() {
                // keep draining so a blocked source can observe the cancel
                continue;
            }
            self.lines_read.fetch_add(1, Ordering::Relaxed);
            let fields = tokenize(&line.text);
            match parse_record(&fields, &self.labels) {
                Ok(Parsed::Accepted(record)) => {
                    let parsed = ParsedLine {
                        record,
                        raw: RawRecord::new(fields),
                    };
                    if record_tx.send(parsed).is_err() {
                        break;
                    }
                }
                Ok(Parsed::Skipped) => {}
                Err(missing) => {
                    self.fail(ProfileError::MissingField {
                        label: missing.label,
                        line: line.number,
                    });
                }
            }
        }
    }

    /// Stage 3: the only writer of the session. After every upsert it posts
    /// the single-slot redraw signal; a pending signal swallows the new one,
    /// so the renderer is never more than one frame behind.
    fn run_aggregator(&self, record_rx: Receiver<ParsedLine>, redraw_tx: Sender<()>) {
        while let Ok(parsed) = record_rx.recv() {
            if self.cancel.is_cancelled() {
                // drain; in-flight records are abandoned
                continue;
            }
            {
                let mut session = self.session.lock().unwrap();
                session.table.upsert(&parsed.record);
                session.history.append(parsed.raw);
            }
            match redraw_tx.try_send(()) {
                Ok(()) | Err(TrySendError::Full(())) => {}
                Err(TrySendError::Disconnected(())) => break,
            }
        }
    }

    /// Stage 4: the only writer of the terminal.
    fn run_renderer(&self, terminal: &mut ui::dashboard::Term, redraw_rx: Receiver<()>) {
        while redraw_rx.recv().is_ok() {
            if self.cancel.is_cancelled() {
                break;
            }
            let lines_read = self.lines_read.load(Ordering::Relaxed);
            let mut session = self.session.lock().unwrap();
            let result = terminal.draw(|frame| {
                ui::dashboard::draw_frame(frame, &mut session, &self.config, lines_read);
            });
            drop(session);

            if let Err(err) = result {
                self.fail(ProfileError::Render(err.into()));
                break;
            }
        }
    }

    /// Stage 5: keyboard and resize events, on the coordinator thread.
    fn run_input(&self, redraw_tx: Sender<()>) {
        use crossterm::event::{self, Event, KeyCode, KeyModifiers};

        while !self.cancel.is_cancelled() {
            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(err) => {
                    self.fail(ProfileError::Render(err.into()));
                    break;
                }
            }

            let ev = match event::read() {
                Ok(ev) => ev,
                Err(err) => {
                    self.fail(ProfileError::Render(err.into()));
                    break;
                }
            };

            let redraw = match ev {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.cancel.cancel();
                        false
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.cancel.cancel();
                        false
                    }
                    KeyCode::Tab => {
                        self.session.lock().unwrap().toggle_pane();
                        true
                    }
                    KeyCode::Up => {
                        self.session.lock().unwrap().scroll_up();
                        true
                    }
                    KeyCode::Down => {
                        self.session.lock().unwrap().scroll_down();
                        true
                    }
                    _ => false,
                },
                Event::Resize(width, height) => {
                    let mut session = self.session.lock().unwrap();
                    session.view.width = width;
                    session.view.height = height;
                    true
                }
                _ => false,
            };

            if redraw {
                let _ = redraw_tx.try_send(());
            }
        }
    }

    fn fail(&self, err: ProfileError) {
        self.fatal.set(err);
        self.cancel.cancel();
    }
}
