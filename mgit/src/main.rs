mod commands;
mod macros;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt::init();

    commands::main()
}
