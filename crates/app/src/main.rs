use ambient_audio_core::{
    AudioPlayer, PlayerConfig, ScriptedSink, SharedPlayer, SinkEvent, SinkFactory,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() -> ambient_audio_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            without_music,
            block_autoplay,
        } => run_simulate(without_music, block_autoplay),
        Commands::Defaults => print_defaults(),
    }
}

/// Drives the mount → (blocked) → `start_music` flow against a scripted
/// sink and prints the state snapshot the render layer would see after each
/// step.
fn run_simulate(without_music: bool, block_autoplay: bool) -> ambient_audio_core::Result<()> {
    tracing::info!(without_music, block_autoplay, "starting playback simulation");

    let sink = ScriptedSink::new();
    if block_autoplay {
        sink.queue_play_outcome(SinkEvent::PlayRejected);
    }
    let probe = sink.clone();
    let factory: SinkFactory = Box::new(move || Ok(Box::new(sink.clone())));

    let player = SharedPlayer::new(AudioPlayer::new(
        PlayerConfig::with_intent(without_music),
        factory,
    ));
    let start = player.start_handle();

    player.with(|p| p.mount())?;
    pump(&player, &probe)?;
    report(&player, "after mount")?;

    start.start_music()?;
    pump(&player, &probe)?;
    report(&player, "after start_music")?;

    Ok(())
}

fn print_defaults() -> ambient_audio_core::Result<()> {
    println!("{}", PlayerConfig::default().to_json()?);
    Ok(())
}

/// Delivers the sink events that accumulated since the last step, tagged
/// with the live generation, the way a host event loop would.
fn pump(player: &SharedPlayer, probe: &ScriptedSink) -> ambient_audio_core::Result<()> {
    let generation = player.with(|p| p.generation())?;
    for event in probe.drain_events() {
        player.with(|p| p.handle_sink_event(generation, event))?;
    }
    Ok(())
}

fn report(player: &SharedPlayer, label: &str) -> ambient_audio_core::Result<()> {
    let state = player.with(|p| p.state())?;
    println!("{label}: {}", state.to_json()?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Background-audio player demo host", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the mount/start-music scenario against a scripted sink.
    Simulate {
        /// Mount with the "start without music" intent.
        #[arg(long)]
        without_music: bool,
        /// Script the platform to reject the first playback start.
        #[arg(long)]
        block_autoplay: bool,
    },
    /// Print the default player configuration as JSON.
    Defaults,
}
