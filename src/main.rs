use anyhow::Context;
use std::io;
use std::process::ExitCode;
use vfs_shell::config::Config;
use vfs_shell::{Interpreter, State};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config: Config = argh::from_env();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let mut interpreter = Interpreter::launch(config)?;

    if let Some(script) = &config.script {
        let state = interpreter
            .run_startup_script(script, &mut io::stdout())
            .with_context(|| format!("failed to run {}", script.display()))?;
        if state == State::Terminated {
            return Ok(());
        }
    }

    interpreter
        .repl(&config.prompt())
        .context("interactive input failed")?;
    Ok(())
}
