//! Device management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use sessionkeeper_core::config::AppConfig;
use sessionkeeper_core::error::AppError;
use sessionkeeper_entity::device::Device;

use crate::output::{self, OutputFormat};

/// Arguments for device commands
#[derive(Debug, Args)]
pub struct DeviceArgs {
    /// Device subcommand
    #[command(subcommand)]
    pub command: DeviceCommand,
}

/// Device subcommands
#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// List a user's devices
    List {
        /// User ID
        user_id: String,
    },
    /// Rename a device
    Rename {
        /// User ID
        user_id: String,
        /// Device ID
        device_id: String,
        /// New display name
        name: String,
    },
    /// Delete a device and its session
    Delete {
        /// User ID
        user_id: String,
        /// Device ID
        device_id: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Device display row
#[derive(Debug, Serialize, Tabled)]
struct DeviceRow {
    /// Device ID
    id: String,
    /// Name
    name: String,
    /// Type
    #[tabled(rename = "type")]
    device_type: String,
    /// IP address
    ip: String,
    /// Last active
    last_active: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            device_type: d.device_type.to_string(),
            ip: d.ip.clone(),
            last_active: d.last_active.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Execute device commands
pub async fn execute(
    args: &DeviceArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let controller = super::create_controller(config).await?;

    match &args.command {
        DeviceCommand::List { user_id } => {
            let user_id = super::parse_user_id(user_id)?;
            let devices = controller.list_devices(user_id).await?;
            let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
            output::print_list(&rows, format);
        }
        DeviceCommand::Rename {
            user_id,
            device_id,
            name,
        } => {
            let user_id = super::parse_user_id(user_id)?;
            controller.rename_device(user_id, device_id, name).await?;
            output::print_success(&format!("Device {device_id} renamed to '{}'", name.trim()));
        }
        DeviceCommand::Delete {
            user_id,
            device_id,
            force,
        } => {
            let user_id = super::parse_user_id(user_id)?;
            let device = controller.get_device(user_id, device_id).await?;
            let prompt = format!("Delete device '{}' and its session?", device.name);
            if !super::confirm(&prompt, *force)? {
                println!("Cancelled.");
                return Ok(());
            }

            controller.delete_device(user_id, device_id).await?;
            output::print_success(&format!("Device '{}' deleted", device.name));
        }
    }

    Ok(())
}
