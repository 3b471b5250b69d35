//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;

use crate::constants::DEFAULT_IMAGE_DIR;

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "DYNART_DEBUG")]
    /// Enable debug logging. Env: DYNART_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "3000", env = "DYNART_PORT")]
    /// http listener, defaults to `3000`.
    /// Env: DYNART_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "DYNART_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: DYNART_LISTEN_ADDRESS
    pub listen_address: String,
    #[clap(long, env = "DYNART_PUBLIC_URL")]
    /// Base URL used when building image links, eg `https://art.example.com`.
    /// Defaults to `http://localhost:<port>`.
    /// Env: DYNART_PUBLIC_URL
    pub public_url: Option<String>,
    #[clap(long, short, default_value = DEFAULT_IMAGE_DIR, env = "DYNART_IMAGE_DIR")]
    /// Where generated images are written and served from.
    /// Env: DYNART_IMAGE_DIR
    pub image_dir: PathBuf,
}

impl CliOptions {
    /// The public base URL, falling back to localhost on the listening port.
    pub fn public_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.clone(),
            None => format!("http://localhost:{}", self.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_public_url() {
        let cli = CliOptions::parse_from(["dynart"]);
        assert_eq!(cli.port.get(), 3000);
        assert_eq!(cli.public_url(), "http://localhost:3000");
        assert_eq!(cli.image_dir, PathBuf::from(DEFAULT_IMAGE_DIR));

        let cli = CliOptions::parse_from([
            "dynart",
            "--port",
            "8080",
            "--public-url",
            "https://art.example.com",
        ]);
        assert_eq!(cli.public_url(), "https://art.example.com");
    }
}
