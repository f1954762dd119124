// Runs an Apply off the UI thread and reports back over the app channel

use crossbeam_channel::Sender;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crate::event::AppMsg;
use crate::pipeline::apply::{ApplyRequest, apply_wallpaper};
use crate::pipeline::desktop::{DesktopKind, Gsettings, WallpaperApplier};
use crate::pipeline::xrandr::{MonitorProvider, Xrandr};

pub struct ApplyWorker {
    tx: Sender<AppMsg>,
}

impl ApplyWorker {
    pub fn new(tx: Sender<AppMsg>) -> Self {
        Self { tx }
    }

    pub fn start(&self, request: ApplyRequest, desktop: DesktopKind) -> thread::JoinHandle<()> {
        self.start_with(Xrandr::new(), Gsettings::new(desktop), request)
    }

    pub fn start_with<P, A>(
        &self,
        provider: P,
        applier: A,
        request: ApplyRequest,
    ) -> thread::JoinHandle<()>
    where
        P: MonitorProvider + Send + 'static,
        A: WallpaperApplier + Send + 'static,
    {
        let tx = self.tx.clone();

        thread::spawn(move || {
            let _span =
                tracing::info_span!("apply", output = %request.output_path.display()).entered();
            let _ = tx.send(AppMsg::ApplyStarted);

            let log_tx = tx.clone();
            // A panic must still produce a result or the UI stays in Running.
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                apply_wallpaper(&provider, &applier, &request, |line| {
                    tracing::info!("{}", line);
                    let _ = log_tx.send(AppMsg::LogMessage(line));
                })
            }));

            let msg = match result {
                Ok(Ok(report)) => AppMsg::ApplyCompleted(report),
                Ok(Err(e)) => {
                    tracing::error!("apply failed: {}", e);
                    AppMsg::ApplyFailed {
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    }
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!("apply panicked: {}", message);
                    AppMsg::ApplyFailed {
                        kind: "Internal error".to_string(),
                        message,
                    }
                }
            };
            let _ = tx.send(msg);
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "apply thread panicked".to_string()
    }
}
