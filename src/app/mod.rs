pub mod args;
mod demo;
mod headless;
mod setup;

pub use args::AppArgs;

use crate::ui::{run_tui, Scrollback};
use crate::window::LogWindow;
use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;

const DEMO_PRODUCERS: usize = 4;

pub async fn launch() -> Result<()> {
    launch_with_args(AppArgs::from_cli()).await
}

pub async fn launch_with_args(args: AppArgs) -> Result<()> {
    let setup::PreparedApp {
        args,
        router,
        store,
        outputs,
        options,
    } = setup::prepare(args)?;

    let demo = args
        .demo
        .then(|| demo::DemoProducers::spawn(router.clone(), DEMO_PRODUCERS));

    let result = if args.headless {
        let surface = Arc::new(Mutex::new(headless::StdoutSurface::new()));
        match LogWindow::open(router, store, surface, outputs, options) {
            Ok(window) => headless::run(window).await,
            Err(e) => Err(e.into()),
        }
    } else {
        let surface = Arc::new(Mutex::new(Scrollback::default()));
        match LogWindow::open(router, store, surface, outputs, options) {
            Ok(window) => run_tui(window).await,
            Err(e) => Err(e.into()),
        }
    };

    if let Some(demo) = demo {
        demo.stop();
    }
    result
}
