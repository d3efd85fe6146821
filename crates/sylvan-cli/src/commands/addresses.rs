//! Address book commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use sylvan_core::AddressId;
use sylvan_core::customer::{NewAddress, sort_by_city};
use sylvan_http::HttpSession;

use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct AddressesCommand {
    #[command(subcommand)]
    pub command: AddressesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AddressesSubcommand {
    /// List saved addresses, default first
    List(ListArgs),

    /// Save a new address
    Add(AddressArgs),

    /// Replace an existing address
    Update {
        /// Address ID
        id: i64,

        #[command(flatten)]
        address: AddressArgs,
    },

    /// Delete an address
    Remove {
        /// Address ID
        id: i64,
    },

    /// Make an address the default
    Default {
        /// Address ID
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Order by city only, ignoring the default flag
    #[arg(long)]
    pub by_city: bool,

    /// Print the addresses as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Short name such as "Home"
    #[arg(long)]
    pub label: Option<String>,

    #[arg(long)]
    pub street: String,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub postal_code: String,

    #[arg(long)]
    pub country: String,

    /// Make this the default address
    #[arg(long)]
    pub default: bool,
}

impl From<AddressArgs> for NewAddress {
    fn from(args: AddressArgs) -> Self {
        NewAddress {
            label: args.label,
            street: args.street,
            city: args.city,
            postal_code: args.postal_code,
            country: args.country,
            is_default: args.default,
        }
    }
}

pub async fn handle(cmd: AddressesCommand) -> Result<()> {
    let session = session::require()?;
    session::persisting(&session, run(cmd.command, &session)).await
}

async fn run(command: AddressesSubcommand, session: &HttpSession) -> Result<()> {
    match command {
        AddressesSubcommand::List(args) => {
            let mut addresses = session
                .addresses()
                .await
                .context("Failed to list addresses")?;
            if args.by_city {
                sort_by_city(&mut addresses);
            }

            if args.json {
                output::json_pretty(&addresses)?;
            } else if addresses.is_empty() {
                output::note("No saved addresses.");
            } else {
                addresses.iter().for_each(output::address_line);
            }
        }
        AddressesSubcommand::Add(args) => {
            let address = session
                .add_address(&args.into())
                .await
                .context("Failed to add address")?;
            output::success(&format!("Address #{} saved", address.id));
        }
        AddressesSubcommand::Update { id, address } => {
            let address = session
                .update_address(AddressId::new(id), &address.into())
                .await
                .context("Failed to update address")?;
            output::success(&format!("Address #{} updated", address.id));
        }
        AddressesSubcommand::Remove { id } => {
            session
                .remove_address(AddressId::new(id))
                .await
                .context("Failed to remove address")?;
            output::success(&format!("Address #{id} removed"));
        }
        AddressesSubcommand::Default { id } => {
            session
                .set_default_address(AddressId::new(id))
                .await
                .context("Failed to set default address")?;
            output::success(&format!("Address #{id} is now the default"));
        }
    }

    Ok(())
}
