//! patchdeck CLI - browse, audition, and export Genos voice patches

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use patchdeck::export::{export_batch, export_patch};
use patchdeck::logging;
use patchdeck::midi::MidiOutputManager;
use patchdeck::patch::{Patch, PatchLibrary};
use patchdeck::prefs::Preferences;
use patchdeck::pst::EncoderConfig;

#[derive(Parser)]
#[command(name = "patchdeck")]
#[command(about = "Genos patch librarian with Logic Pro preset export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List MIDI output devices
    Devices,

    /// List the categories in a patch library
    Categories {
        /// Patch library JSON file
        library: PathBuf,
    },

    /// List patches, optionally filtered
    List {
        /// Patch library JSON file
        library: PathBuf,

        /// Only show patches in this category
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive search over name and category
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Audition a patch: send Bank Select + Program Change to a device
    Send {
        /// Patch library JSON file
        library: PathBuf,

        /// Patch name (exact, or a unique prefix)
        name: String,

        /// MIDI output device index (defaults to the last used device)
        #[arg(short, long)]
        device: Option<usize>,

        /// MIDI channel 1-16 (defaults to the saved preference)
        #[arg(short, long)]
        channel: Option<u8>,
    },

    /// Export one patch as a .pst preset
    Export {
        /// Patch library JSON file
        library: PathBuf,

        /// Patch name (exact, or a unique prefix)
        name: String,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// MIDI channel stored in the preset (1-16)
        #[arg(short, long, default_value = "1")]
        channel: u8,

        /// MIDI destination device name stored in the preset
        #[arg(long)]
        destination: Option<String>,
    },

    /// Export every patch (optionally one category) as .pst presets
    ExportAll {
        /// Patch library JSON file
        library: PathBuf,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Only export patches in this category
        #[arg(long)]
        category: Option<String>,

        /// MIDI channel stored in the presets (1-16)
        #[arg(short, long, default_value = "1")]
        channel: u8,

        /// MIDI destination device name stored in the presets
        #[arg(long)]
        destination: Option<String>,
    },
}

fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Devices => {
            let manager = MidiOutputManager::new();
            let devices = manager.list_devices().map_err(|e| e.to_string())?;
            if devices.is_empty() {
                println!("No MIDI output devices found");
            }
            for device in devices {
                println!("{:3}  {}", device.index, device.name);
            }
            Ok(())
        }

        Commands::Categories { library } => {
            let library = PatchLibrary::load(&library).map_err(|e| e.to_string())?;
            for (name, count) in library.categories() {
                println!("{:4}  {}", count, name);
            }
            Ok(())
        }

        Commands::List {
            library,
            category,
            search,
        } => {
            let library = PatchLibrary::load(&library).map_err(|e| e.to_string())?;
            let patches = library.filter(category.as_deref(), search.as_deref());
            println!("{} voices", patches.len());
            for p in patches {
                println!(
                    "{:<36} {:<18} PC {:>3}  LSB {:>3}  MSB {:>3}",
                    p.name, p.category, p.pc, p.lsb, p.msb
                );
            }
            Ok(())
        }

        Commands::Send {
            library,
            name,
            device,
            channel,
        } => {
            let library = PatchLibrary::load(&library).map_err(|e| e.to_string())?;
            let patch = find_patch(&library, &name)?;

            let mut prefs = Preferences::load();
            let channel = channel.unwrap_or(prefs.midi_channel);

            let manager = MidiOutputManager::new();
            let index = match device {
                Some(index) => index,
                None => resolve_saved_device(&manager, prefs.last_device.as_deref())?,
            };

            let device_name = manager.connect(index).map_err(|e| e.to_string())?;
            manager
                .send_patch(channel, patch)
                .map_err(|e| e.to_string())?;

            println!(
                "Sent: {} (PC {} LSB {} MSB {}) to {} on channel {}",
                patch.name, patch.pc, patch.lsb, patch.msb, device_name, channel
            );
            logging::append(
                "INFO",
                "send",
                &format!("sent {:?} to {}", patch.name, device_name),
            );

            prefs.midi_channel = channel;
            prefs.last_device = Some(device_name);
            if let Err(e) = prefs.save() {
                log::warn!("Failed to save preferences: {}", e);
            }
            Ok(())
        }

        Commands::Export {
            library,
            name,
            out,
            channel,
            destination,
        } => {
            let library = PatchLibrary::load(&library).map_err(|e| e.to_string())?;
            let patch = find_patch(&library, &name)?;
            let config = encoder_config(channel, destination);

            fs::create_dir_all(&out)
                .map_err(|e| format!("failed to create {}: {}", out.display(), e))?;
            let path = export_patch(patch, &config, &out).map_err(|e| e.to_string())?;

            println!("Wrote {}", path.display());
            Ok(())
        }

        Commands::ExportAll {
            library,
            out,
            category,
            channel,
            destination,
        } => {
            let library = PatchLibrary::load(&library).map_err(|e| e.to_string())?;
            let patches: Vec<Patch> = library
                .filter(category.as_deref(), None)
                .into_iter()
                .cloned()
                .collect();
            let config = encoder_config(channel, destination);

            fs::create_dir_all(&out)
                .map_err(|e| format!("failed to create {}: {}", out.display(), e))?;
            let report = export_batch(&patches, &config, &out).map_err(|e| e.to_string())?;

            println!(
                "Exported {} of {} presets to {}",
                report.success_count,
                patches.len(),
                report.directory.display()
            );
            for failed in &report.errors {
                eprintln!("  failed: {}: {}", failed.name, failed.error);
            }
            logging::append(
                "INFO",
                "export",
                &format!(
                    "exported {}/{} presets to {}",
                    report.success_count,
                    patches.len(),
                    report.directory.display()
                ),
            );
            Ok(())
        }
    }
}

fn encoder_config(channel: u8, destination: Option<String>) -> EncoderConfig {
    let mut config = EncoderConfig {
        midi_channel: channel,
        ..EncoderConfig::default()
    };
    if let Some(destination) = destination {
        config.midi_destination = destination;
    }
    config
}

fn find_patch<'a>(library: &'a PatchLibrary, name: &str) -> Result<&'a Patch, String> {
    library
        .find_by_name(name)
        .ok_or_else(|| format!("no patch uniquely matches {:?} (try `list --search`)", name))
}

/// Resolve the saved device name to a current port index.
fn resolve_saved_device(
    manager: &MidiOutputManager,
    saved: Option<&str>,
) -> Result<usize, String> {
    let saved = saved
        .ok_or_else(|| String::from("no device given and none saved; pass --device (see `devices`)"))?;
    let devices = manager.list_devices().map_err(|e| e.to_string())?;
    devices
        .iter()
        .find(|d| d.name == saved)
        .map(|d| d.index)
        .ok_or_else(|| format!("saved device {:?} is not present; pass --device", saved))
}
