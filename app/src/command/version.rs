use menubot_telegram::help_text;

/// Prints the version and the bot command list.
#[derive(Debug, Clone, Copy)]
pub struct VersionStrategy;

impl super::CommandStrategy for VersionStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        println!("menubot {}", env!("CARGO_PKG_VERSION"));
        println!();
        print!("{}", help_text());
        Ok(())
    }
}
