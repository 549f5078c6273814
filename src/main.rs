mod config;
mod connection;
mod connector;
mod endpoint;
mod err;
mod forwarder;
mod logger;
mod opt;
mod tcp;

#[cfg(test)]
mod mock;

use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let options: opt::Options = clap::Parser::parse();

    if let Err(e) = logger::init(logger::Sink::from_flag(options.syslog)) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    relay(tcp::TcpTransport, connector::Settings::default(), &options).await
}

/// Runs until a fatal error, which is logged and turned into a failing exit code.
async fn relay<T: tcp::Transport>(
    transport: T,
    settings: connector::Settings,
    options: &opt::Options,
) -> ExitCode {
    let (source, destination) = options.endpoints();
    log::info!("Relaying {} -> {}", source, destination);

    let connector = connector::Connector::new(transport, settings);
    match forwarder::Forwarder::new(connector, source, destination).run().await {
        Ok(never) => match never {},
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
