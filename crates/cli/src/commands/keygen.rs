//! Keygen command handler.

use clap::Args;
use ideaforge_cipher::generate_key_base64;
use ideaforge_core::AppResult;

/// Generate a prompt encryption key
#[derive(Args, Debug)]
pub struct KeygenCommand {
    /// Print as an IDEAFORGE_PROMPT_KEY assignment
    #[arg(long)]
    pub env: bool,
}

impl KeygenCommand {
    pub fn execute(&self) -> AppResult<()> {
        let key = generate_key_base64();

        if self.env {
            println!("IDEAFORGE_PROMPT_KEY={}", key);
        } else {
            println!("{}", key);
        }

        Ok(())
    }
}
