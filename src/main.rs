use anyhow::Result;
use clap::{Parser, Subcommand};
use dlconv::{builtin::builtin_registry, config::load_config, Instance};
use tracing::info;

#[derive(Parser)]
#[clap(
    name = "dlconv",
    version,
    about = "Convert and manage domain lists in various formats"
)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert domain list data from one format to another by using config file
    #[clap(visible_alias = "conv")]
    Convert {
        /// URI of the JSON format config file, support both local file path and remote HTTP(S) URL
        #[clap(short, long, env = "DLCONV_CONFIG", default_value = "config.json")]
        config: String,
    },
    /// List available domain lists
    #[clap(visible_alias = "ls")]
    List {
        /// URI of the JSON format config file
        #[clap(short, long, env = "DLCONV_CONFIG", default_value = "config.json")]
        config: String,
    },
}

async fn real_main(args: Args) -> Result<()> {
    match args.command {
        Command::Convert { config } => convert(&config).await,
        Command::List { config } => list(&config).await,
    }
}

async fn convert(uri: &str) -> Result<()> {
    let config = load_config(uri).await?;
    let registry = builtin_registry();

    let mut instance = Instance::new(config);
    instance.run(&registry).await?;

    info!("convert success");
    Ok(())
}

async fn list(uri: &str) -> Result<()> {
    let config = load_config(uri).await?;
    let registry = builtin_registry();

    let mut instance = Instance::new(config);
    instance.run_inputs(&registry).await?;

    let container = instance.container();
    let mut names = container.names();
    names.sort();

    println!("available domain lists ({} total):", names.len());
    println!("---");
    for name in names {
        if let Some(entry) = container.get(&name) {
            println!("  - {} ({} domains)", name, entry.domains().len());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "dlconv=info,dlc_std=info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    match real_main(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("process exit: {:?}", e);
            std::process::exit(1);
        }
    }
}
