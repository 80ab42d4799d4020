mod app;

use anyhow::Result;

use app::{App, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tilepanes=info".parse()?),
        )
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = args.load_config()?;
    App::new(config, args.width, args.items).run()
}
