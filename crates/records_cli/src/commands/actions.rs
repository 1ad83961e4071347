use clap::Args;
use anyhow::Result;
use uuid::Uuid;

use records_core::status_label;

use crate::commands::Desk;

#[derive(Debug, Args)]
pub struct ActionsArgs {
    /// The request UUID
    #[arg(short, long)]
    pub id: Uuid,
}

pub async fn execute(desk: Desk, args: ActionsArgs) -> Result<()> {
    // Re-read the one record so the answer reflects anything changed since the list loaded.
    let request = desk.service.reload(args.id).await?;
    let actions = desk.service.actions_for(args.id)?;

    println!("📄 {} for {} ({})", request.document_type, request.student.full_name(), status_label(request.status));
    if let Some(note) = &request.notes {
        println!("   Note: {}", note);
    }

    if actions.is_empty() {
        println!("   No actions available.");
    }
    for availability in actions {
        let marker = if availability.enabled { "✅" } else { "🚫" };
        println!(
            "   {} {:<16} -> {}",
            marker,
            availability.action.as_str(),
            status_label(availability.target)
        );
    }

    desk.close();
    Ok(())
}
