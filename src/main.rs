use std::process::ExitCode;

use colorthresh::capture::FrameSource;
use colorthresh::cli::ThresholdArgs;
use colorthresh::config::WindowNames;
use colorthresh::utils::init_logging;
use colorthresh::view::ThresholdView;
use colorthresh::window::{AutoRenderer, Ui};
use colorthresh::{window, Result, Source, ThresholdSession};

fn main() -> ExitCode {
    let (args, fallback) = ThresholdArgs::parse_lenient(std::env::args_os());
    if let Err(e) = init_logging(args.quiet) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    if let Some(reason) = fallback {
        log::warn!("Ignoring arguments ({}), using camera 0", reason);
    }

    match run(args.source()) {
        Ok(()) => {
            log::info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(source: Source) -> Result<()> {
    let session = ThresholdSession::new(source);
    log::info!("Opening {} ({:?} mode)", session.source(), session.mode());
    let frames = FrameSource::open(session.source())?;
    let mut view = ThresholdView::new(session, frames, WindowNames::default());

    window::create("colorthresh", |ui: &mut Ui, renderer: &mut AutoRenderer| {
        view.draw(ui, renderer)
    })?;

    let session = view.session();
    log::info!(
        "Final bounds in {}: {:?}",
        session.color_space(),
        session.values()
    );
    Ok(())
}
