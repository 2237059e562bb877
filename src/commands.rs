//! CLI command definitions
//!
//! Defines the clap commands for the console.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a run and stream its output until it completes
    Run {
        /// Device under test (a name from the target registry)
        #[arg(long, short)]
        device: String,

        /// Prompt bundle parameterizing the run
        #[arg(long, short)]
        prompts: String,

        /// Append a test from the catalog to the order
        /// Can be specified multiple times: --test "gnoi os install" --test "gnoi reset"
        #[arg(long = "test", short = 't')]
        tests: Vec<String>,

        /// Drop a test from the seeded default order by name
        #[arg(long = "skip")]
        skips: Vec<String>,

        /// Move a test within the order, as <from>:<to> positions
        #[arg(long = "move", short = 'm')]
        moves: Vec<String>,
    },

    /// Attach to a run already in progress and stream its output
    Watch,

    /// Device registry management
    #[command(subcommand)]
    Target(TargetCommands),

    /// Prompt bundle management
    #[command(subcommand)]
    Prompts(PromptsCommands),

    /// Test catalog queries
    #[command(subcommand)]
    Tests(TestCommands),

    /// Uploaded file management
    #[command(subcommand)]
    File(FileCommands),
}

#[derive(Subcommand)]
pub enum TargetCommands {
    /// List registered devices
    List,

    /// Show one device
    Show {
        /// Device name
        name: String,
    },

    /// Create or update a device
    Set {
        /// Device name
        name: String,

        /// Address the tester dials, host:port
        #[arg(long)]
        address: String,

        /// Handle of an uploaded CA certificate
        #[arg(long)]
        ca: Option<String>,

        /// Handle of an uploaded CA private key
        #[arg(long)]
        ca_key: Option<String>,
    },

    /// Remove a device
    Delete {
        /// Device name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum PromptsCommands {
    /// List saved prompt bundles
    List,

    /// Show the field schema bundles must fill
    Schema,

    /// Create or update a bundle through the schema-driven form
    Edit {
        /// Bundle name; hydrates the form when the bundle already exists
        name: String,

        /// Set a prompt field, as <key>=<value>
        #[arg(long = "field", short = 'f')]
        fields: Vec<String>,

        /// Set a file field to an already-uploaded handle, as <key>=<handle>
        #[arg(long = "file")]
        files: Vec<String>,

        /// Upload a local file and patch its handle into a file field,
        /// as <key>=<path>
        #[arg(long = "upload", short = 'u')]
        uploads: Vec<String>,
    },

    /// Remove a bundle
    Delete {
        /// Bundle name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum TestCommands {
    /// List the test catalog by suite
    List,

    /// Show the default test order
    Order,
}

#[derive(Subcommand)]
pub enum FileCommands {
    /// Upload a file and print the handle the server assigned
    Upload {
        /// Local path to upload
        path: PathBuf,
    },

    /// Delete an uploaded file by handle
    Delete {
        /// Assigned handle
        name: String,
    },
}
