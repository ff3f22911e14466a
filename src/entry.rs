use clap::Parser;

use logplayer::args::PlayerArgs;
use logplayer::corpus;
use logplayer::error::AppResult;
use logplayer::replay::{self, ReplayConfig};
use logplayer::shutdown::{setup_signal_shutdown_handler, shutdown_channel};

pub(crate) fn run() -> AppResult<()> {
    let args = PlayerArgs::parse();
    crate::logger::init_logging(args.verbose, args.no_color);

    let config = args.to_config();
    run_config(&config)
}

fn run_config(config: &ReplayConfig) -> AppResult<()> {
    // Built before the runtime exists: no worker can observe a partial corpus.
    let corpus = corpus::load(&config.file, config.input)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (shutdown_tx, _) = shutdown_channel();
        let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

        let result = replay::run(config, corpus, &shutdown_tx).await;

        drop(shutdown_tx.send(()));
        drop(signal_handle.await);

        result.map(drop)
    })
}
