mod game;
mod modify;

use std::process::ExitCode;

use argbind::ArgumentQueue;

use crate::modify::Modify;

pub fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut arguments = ArgumentQueue::from_env();
    let mut modify = Modify::default();

    let binding = match argbind::bind(&mut modify, &mut arguments) {
        Ok(binding) => binding,
        Err(error) => {
            log::error!("{error}");
            return ExitCode::FAILURE;
        },
    };

    if modify.version {
        println!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let binding = match binding.require_positionals() {
        Ok(binding) => binding,
        Err(error) => {
            log::error!("{error}");
            return ExitCode::FAILURE;
        },
    };

    if !arguments.is_empty() {
        log::warn!("Ignoring unexpected arguments: {arguments:?}");
    }

    if let Err(error) = binding.invoke_all(&mut modify) {
        log::error!("{error}");
        return ExitCode::FAILURE;
    }

    modify.report();
    ExitCode::SUCCESS
}
