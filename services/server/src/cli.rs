use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cloudmodel-server", about = "CloudModel event serializer")]
pub struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Directory of static files to serve for any non-reserved path.
    #[arg(long = "static_dir")]
    pub static_dir: Option<PathBuf>,
}

impl Args {
    /// Validates `static_dir` actually exists; `main` exits non-zero if not.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(dir) = &self.static_dir
            && !dir.is_dir()
        {
            return Err(format!("static dir {} does not exist", dir.display()));
        }
        Ok(())
    }
}
