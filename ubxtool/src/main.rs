use clap::Parser;

mod extract;

trait ToolRun {
    fn run(&self) -> anyhow::Result<()>;
}

fn main() -> anyhow::Result<()> {
    extract::ExtractOpts::parse().run()
}
