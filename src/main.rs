use clap::Parser;
use dynart::compose::Composer;
use dynart::config::setup_logging;
use dynart::palette::PaletteTable;
use dynart::store::ImageStore;
use dynart::web::AppState;
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = dynart::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let store = match ImageStore::new(&cli.image_dir, &cli.public_url()) {
        Ok(store) => store,
        Err(err) => {
            error!("Invalid public URL {:?}: {}", cli.public_url(), err);
            return;
        }
    };

    let composer = match Composer::new(PaletteTable::default()) {
        Ok(composer) => composer,
        Err(err) => {
            error!("Failed to load fonts: {}", err);
            return;
        }
    };

    if let Err(err) = dynart::web::setup_server(
        &cli.listen_address,
        cli.port,
        AppState::new(store, composer),
    )
    .await
    {
        error!("Application error: {}", err);
    }
}
