//! CharKit CLI - Command-line interface for character import and rigging
//!
//! This binary binds the material pipeline and the rig compiler to user
//! commands operating on scene document JSON files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use charkit_cli::commands;
use charkit_cli::link::{LISTEN_PORT, PEER_PORTS};
use charkit_material::QuickSetMode;
use charkit_rig::SourceKind;
use charkit_spec::ImportType;

/// CharKit - Character import, materials, and facial rigging
#[derive(Parser)]
#[command(name = "charkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// CLI spelling of the import type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ImportTypeArg {
    Fbx,
    Obj,
}

impl From<ImportTypeArg> for ImportType {
    fn from(value: ImportTypeArg) -> Self {
        match value {
            ImportTypeArg::Fbx => ImportType::Fbx,
            ImportTypeArg::Obj => ImportType::Obj,
        }
    }
}

/// CLI spelling of the quick-set mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum QuickSetArg {
    Opaque,
    Blend,
    Hashed,
    SingleSided,
    DoubleSided,
    UpdateSelected,
    UpdateAll,
    Reset,
}

impl From<QuickSetArg> for QuickSetMode {
    fn from(value: QuickSetArg) -> Self {
        match value {
            QuickSetArg::Opaque => QuickSetMode::Opaque,
            QuickSetArg::Blend => QuickSetMode::Blend,
            QuickSetArg::Hashed => QuickSetMode::Hashed,
            QuickSetArg::SingleSided => QuickSetMode::SingleSided,
            QuickSetArg::DoubleSided => QuickSetMode::DoubleSided,
            QuickSetArg::UpdateSelected => QuickSetMode::UpdateSelected,
            QuickSetArg::UpdateAll => QuickSetMode::UpdateAll,
            QuickSetArg::Reset => QuickSetMode::Reset,
        }
    }
}

/// CLI spelling of the retarget source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKindArg {
    ShapeKeys,
    Bones,
}

impl From<SourceKindArg> for SourceKind {
    fn from(value: SourceKindArg) -> Self {
        match value {
            SourceKindArg::ShapeKeys => SourceKind::ShapeKeys,
            SourceKindArg::Bones => SourceKind::Bones,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Import a character: scan textures and build every material
    Import {
        /// Scene document JSON
        doc: PathBuf,

        /// Source file the character was exported from (decides texture
        /// directory conventions)
        #[arg(short, long)]
        source: PathBuf,

        /// Import type
        #[arg(long, value_enum, default_value_t = ImportTypeArg::Fbx)]
        import_type: ImportTypeArg,

        /// Material parameter JSON (defaults apply when omitted)
        #[arg(long)]
        params: Option<PathBuf>,

        /// Preferences JSON (defaults apply when omitted)
        #[arg(long)]
        prefs: Option<PathBuf>,

        /// Output document path (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rebuild a selection of material graphs
    BuildMaterials {
        /// Scene document JSON
        doc: PathBuf,

        /// Source file the character was exported from
        #[arg(short, long)]
        source: PathBuf,

        /// Import type
        #[arg(long, value_enum, default_value_t = ImportTypeArg::Fbx)]
        import_type: ImportTypeArg,

        /// Material parameter JSON
        #[arg(long)]
        params: Option<PathBuf>,

        /// Preferences JSON
        #[arg(long)]
        prefs: Option<PathBuf>,

        /// Material names to rebuild (repeatable; default: all)
        #[arg(short, long)]
        material: Vec<String>,

        /// Regex narrowing the material names when no explicit selection
        /// is given
        #[arg(long)]
        filter: Option<String>,

        /// Output document path (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile the facial-control config into bones and drivers
    BuildFacerig {
        /// Scene document JSON
        doc: PathBuf,

        /// Facial-control config JSON
        #[arg(short, long)]
        config: PathBuf,

        /// Output document path (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Drive the compiled rig from a foreign capture performance
    Retarget {
        /// Scene document JSON
        doc: PathBuf,

        /// Facial-control config JSON
        #[arg(short, long)]
        config: PathBuf,

        /// Foreign object carrying the performance
        #[arg(long)]
        source_object: String,

        /// How the foreign object's values are read
        #[arg(long, value_enum, default_value_t = SourceKindArg::ShapeKeys)]
        source_kind: SourceKindArg,

        /// ARKit proxy armature whose custom properties register the
        /// session remap
        #[arg(long)]
        arkit_proxy: Option<String>,

        /// Output document path (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse, filter and resample a motion capture CSV
    ImportMotion {
        /// Motion CSV file
        input: PathBuf,

        /// Output clip JSON (default: input with .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Low-pass filter factor in [0, 1]
        #[arg(long, default_value_t = 0.0)]
        filter: f64,

        /// Uniform amplitude variance fraction
        #[arg(long, default_value_t = 0.0)]
        variance: f64,

        /// Seed for the variance stream
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Channel names passed through raw (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Apply a batch blend/culling/refresh/rebuild operation
    Quickset {
        /// Scene document JSON
        doc: PathBuf,

        /// Operation to apply
        #[arg(value_enum)]
        mode: QuickSetArg,

        /// Source file for texture resolution (default: the document)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Import type
        #[arg(long, value_enum, default_value_t = ImportTypeArg::Fbx)]
        import_type: ImportTypeArg,

        /// Material parameter JSON
        #[arg(long)]
        params: Option<PathBuf>,

        /// Preferences JSON
        #[arg(long)]
        prefs: Option<PathBuf>,

        /// Material names to touch (repeatable; default: all)
        #[arg(short, long)]
        material: Vec<String>,

        /// Regex narrowing the material names
        #[arg(long)]
        filter: Option<String>,

        /// Output document path (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the companion-tool TCP link session
    Link {
        /// Port to listen on
        #[arg(long, default_value_t = LISTEN_PORT)]
        port: u16,

        /// Peer ports to probe (repeatable; default: the well-known pair)
        #[arg(long)]
        peer: Vec<u16>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import {
            doc,
            source,
            import_type,
            params,
            prefs,
            output,
        } => commands::import::run(
            &doc,
            &source,
            import_type.into(),
            params.as_deref(),
            prefs.as_deref(),
            output.as_deref(),
        ),
        Commands::BuildMaterials {
            doc,
            source,
            import_type,
            params,
            prefs,
            material,
            filter,
            output,
        } => commands::build_materials::run(
            &doc,
            &source,
            import_type.into(),
            params.as_deref(),
            prefs.as_deref(),
            &material,
            filter.as_deref(),
            output.as_deref(),
        ),
        Commands::BuildFacerig {
            doc,
            config,
            output,
        } => commands::build_facerig::run(&doc, &config, output.as_deref()),
        Commands::Retarget {
            doc,
            config,
            source_object,
            source_kind,
            arkit_proxy,
            output,
        } => commands::retarget::run(
            &doc,
            &config,
            &source_object,
            source_kind.into(),
            arkit_proxy.as_deref(),
            output.as_deref(),
        ),
        Commands::ImportMotion {
            input,
            output,
            filter,
            variance,
            seed,
            exclude,
        } => commands::import_motion::run(
            &input,
            output.as_deref(),
            filter,
            variance,
            seed,
            &exclude,
        ),
        Commands::Quickset {
            doc,
            mode,
            source,
            import_type,
            params,
            prefs,
            material,
            filter,
            output,
        } => {
            let source = source.unwrap_or_else(|| doc.clone());
            commands::quickset::run(
                &doc,
                mode.into(),
                &source,
                import_type.into(),
                params.as_deref(),
                prefs.as_deref(),
                &material,
                filter.as_deref(),
                output.as_deref(),
            )
        }
        Commands::Link { port, peer } => {
            let peers = if peer.is_empty() {
                PEER_PORTS.to_vec()
            } else {
                peer
            };
            commands::link::run(port, &peers)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:#}", colored::Colorize::red("error"));
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_import() {
        let cli = Cli::try_parse_from([
            "charkit",
            "import",
            "scene.json",
            "--source",
            "character.fbx",
            "--import-type",
            "fbx",
        ])
        .unwrap();
        match cli.command {
            Commands::Import {
                doc,
                source,
                import_type,
                ..
            } => {
                assert_eq!(doc, PathBuf::from("scene.json"));
                assert_eq!(source, PathBuf::from("character.fbx"));
                assert_eq!(import_type, ImportTypeArg::Fbx);
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn cli_parses_quickset_mode() {
        let cli = Cli::try_parse_from([
            "charkit",
            "quickset",
            "scene.json",
            "update-all",
            "--material",
            "Std_Skin_Head",
        ])
        .unwrap();
        match cli.command {
            Commands::Quickset { mode, material, .. } => {
                assert_eq!(mode, QuickSetArg::UpdateAll);
                assert_eq!(material, vec!["Std_Skin_Head".to_string()]);
            }
            _ => panic!("expected quickset command"),
        }
    }

    #[test]
    fn cli_parses_retarget_kind() {
        let cli = Cli::try_parse_from([
            "charkit",
            "retarget",
            "scene.json",
            "--config",
            "facerig.json",
            "--source-object",
            "Capture",
            "--source-kind",
            "bones",
        ])
        .unwrap();
        match cli.command {
            Commands::Retarget { source_kind, .. } => {
                assert_eq!(source_kind, SourceKindArg::Bones);
            }
            _ => panic!("expected retarget command"),
        }
    }

    #[test]
    fn cli_defaults_link_ports() {
        let cli = Cli::try_parse_from(["charkit", "link"]).unwrap();
        match cli.command {
            Commands::Link { port, peer } => {
                assert_eq!(port, LISTEN_PORT);
                assert!(peer.is_empty());
            }
            _ => panic!("expected link command"),
        }
    }
}
