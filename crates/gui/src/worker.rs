//! Contains [Worker], the background thread that probes source videos and runs
//! extractions so the UI never blocks on `ffmpeg`.

use std::io;
use std::path::PathBuf;

use egui::Context;

use media::{
    ExtractError, ExtractionOptions, ProbeError, SourceInfo, Stage, SystemRunner, ToolRunner,
};
use util::channels::ChannelResult;
use util::channels::message_channel::{self, Inbox, Outbox};
use util::drop_join_thread::{self, DropJoinHandle};

/// The background worker that handles [WorkerTask]s one at a time.
///
/// The thread lives until the worker's outbox is dropped (which happens when
/// this object is dropped). If the thread dies early the inbox reports the
/// connection as dropped.
#[derive(Debug)]
pub struct Worker {
    // Do not change the field order here. The inbox and outbox have to be
    // dropped before the thread, otherwise we'll deadlock.
    inbox: Inbox<WorkerMsg>,
    outbox: Outbox<WorkerTask>,
    _thread: DropJoinHandle<()>,
}

impl Worker {
    /// Create a new worker that runs the real `ffmpeg` and `ffprobe`.
    pub fn new() -> io::Result<Self> {
        Self::with_runner(SystemRunner::new())
    }

    /// Create a new worker that runs tools with `runner`.
    pub fn with_runner<R>(runner: R) -> io::Result<Self>
    where
        R: ToolRunner + Send + 'static,
    {
        let (frontend_inbox, worker_outbox) = message_channel::new::<WorkerMsg>();
        let (worker_inbox, frontend_outbox) = message_channel::new::<WorkerTask>();

        let thread = drop_join_thread::spawn_named("worker", move || {
            worker(runner, worker_inbox, worker_outbox);
        })?;

        Ok(Self {
            inbox: frontend_inbox,
            outbox: frontend_outbox,
            _thread: thread,
        })
    }

    /// Access an inbox for messages from the worker.
    pub fn inbox(&self) -> &Inbox<WorkerMsg> {
        &self.inbox
    }

    /// Queue a task for the worker.
    pub fn send(&self, task: WorkerTask) -> ChannelResult<()> {
        self.outbox.send(task).map(|_| ())
    }
}

#[cfg(test)]
impl Worker {
    /// A worker whose thread has already exited.
    pub(crate) fn stopped() -> Self {
        let (frontend_inbox, worker_outbox) = message_channel::new::<WorkerMsg>();
        let (worker_inbox, frontend_outbox) = message_channel::new::<WorkerTask>();

        let thread = drop_join_thread::spawn_named("worker", move || {
            drop((worker_inbox, worker_outbox));
        })
        .unwrap();
        assert!(frontend_inbox.wait().is_err());

        Self {
            inbox: frontend_inbox,
            outbox: frontend_outbox,
            _thread: thread,
        }
    }
}

/// A message from the worker thread to the frontend.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerMsg {
    /// A line for the status log.
    Status(String),

    /// A probe finished. Unknown values mean the probe failed or the source
    /// didn't report them.
    SourceProbed { path: PathBuf, info: SourceInfo },

    /// An extraction finished (successfully or not). Every status line for it
    /// has already been sent.
    ExtractionDone { success: bool },
}

/// A task that the worker can be asked to do.
#[derive(Debug, Clone)]
pub enum WorkerTask {
    /// Ask this context to repaint after each message.
    UseUiContext(Context),
    Probe(PathBuf),
    Extract(ExtractionOptions),
}

struct WorkerData<R> {
    runner: R,
    outbox: Outbox<WorkerMsg>,
    ui_context: Option<Context>,
}

impl<R: ToolRunner> WorkerData<R> {
    /// Sends a message to the outbox and requests a UI re-draw.
    fn send_outbox_msg(&self, msg: WorkerMsg) -> ChannelResult<()> {
        self.outbox.send(msg)?;
        if let Some(ui_context) = self.ui_context.as_ref() {
            ui_context.request_repaint();
        }
        Ok(())
    }

    fn status(&self, line: impl Into<String>) -> ChannelResult<()> {
        self.send_outbox_msg(WorkerMsg::Status(line.into()))
    }

    fn probe(&self, path: PathBuf) -> ChannelResult<()> {
        let info = match media::probe(&self.runner, &path) {
            Ok(info) => info,
            Err(e @ ProbeError::ToolMissing) => {
                self.status(format!("Probe error: {e}"))?;
                SourceInfo::default()
            }
        };
        self.send_outbox_msg(WorkerMsg::SourceProbed { path, info })
    }

    fn extract(&self, options: &ExtractionOptions) -> ChannelResult<()> {
        let mut printable = String::new();
        let result = media::extract_with_progress(options, &self.runner, |stage| {
            if let Stage::CommandReady(command) = stage {
                printable = command.to_string();
            }
        });

        let success = match result {
            Ok(result) => {
                self.status(&printable)?;
                if !result.success() {
                    self.status(format!(
                        "ffmpeg returned non-zero exit code: {}",
                        result.exit_code
                    ))?;
                } else if options.dry_run() {
                    self.status("(dry-run) Not executing ffmpeg.")?;
                } else {
                    self.status(format!(
                        "Wrote {} frames to {}",
                        result.frame_count,
                        options.output_dir().display()
                    ))?;
                }
                result.success()
            }
            Err(e) => {
                log_extract_error(&e);
                self.status(format!("Error: {e}"))?;
                false
            }
        };

        self.send_outbox_msg(WorkerMsg::ExtractionDone { success })
    }
}

fn log_extract_error(e: &ExtractError) {
    match e {
        ExtractError::ToolMissing | ExtractError::InvalidPath(_) => {
            util::debug_log_warning!("Extraction rejected: {e}");
        }
        _ => util::debug_log_error!("Extraction failed: {e}"),
    }
}

fn worker<R: ToolRunner>(
    runner: R,
    worker_inbox: Inbox<WorkerTask>,
    worker_outbox: Outbox<WorkerMsg>,
) {
    let mut worker_data = WorkerData {
        runner,
        outbox: worker_outbox,
        ui_context: None,
    };

    // Runs until either end of the connection hangs up.
    while let Ok(task) = worker_inbox.wait() {
        let result = match task {
            WorkerTask::UseUiContext(ctx) => {
                worker_data.ui_context = Some(ctx);
                Ok(())
            }
            WorkerTask::Probe(path) => {
                util::debug_log_info!("Probing `{}`.", path.display());
                worker_data.probe(path)
            }
            WorkerTask::Extract(options) => {
                util::debug_log_info!("Extracting from `{}`.", options.input().display());
                worker_data.extract(&options)
            }
        };

        if result.is_err() {
            break;
        }
    }
}
