use clap::Subcommand;

#[derive(Subcommand)]
pub enum DoorCommands {
    /// Show a door with its location, devices and interconnections
    Show {
        /// Door ID
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a door's name, room or notes
    Edit {
        /// Door ID
        id: i64,

        /// New door name
        #[arg(long)]
        name: Option<String>,

        /// Move the door to this room
        #[arg(long, conflicts_with = "no_room")]
        room: Option<i64>,

        /// Detach the door from its room
        #[arg(long)]
        no_room: bool,

        /// New notes (empty string clears them)
        #[arg(long)]
        notes: Option<String>,

        /// Skip interactive prompts; omitted values keep their current value
        #[arg(long)]
        non_interactive: bool,
    },
}
