use clap::{Args, Subcommand};
use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use records_core::lifecycle::Action;
use records_core::receipt::issue_receipt_number;
use records_core::status_label;
use records_service::Notice;

use crate::commands::Desk;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// The request UUID
    #[arg(short, long)]
    pub id: Uuid,

    #[command(subcommand)]
    pub action: ActionCommand,
}

#[derive(Debug, Subcommand)]
pub enum ActionCommand {
    /// Set the fee and ask the student for payment
    SetAmount {
        #[arg(long)]
        amount: Decimal,
    },

    /// Confirm the payment (accounting only)
    ApprovePayment {
        /// Official receipt number; issued automatically when omitted
        #[arg(long)]
        receipt: Option<String>,
    },

    /// Approve the request and open it for editing
    Approve,

    /// Reject the request with a note for the student
    Reject {
        #[arg(long)]
        note: String,
    },

    /// Mark the document printed and ready for pick-up
    Print,

    /// Print a released document again
    Reprint,
}

impl ActionCommand {
    fn into_action(self, id: Uuid) -> Action {
        match self {
            ActionCommand::SetAmount { amount } => Action::SetAmount { amount },
            ActionCommand::ApprovePayment { receipt } => Action::ApprovePayment {
                receipt_number: receipt.unwrap_or_else(|| issue_receipt_number(id, Utc::now())),
            },
            ActionCommand::Approve => Action::Approve,
            ActionCommand::Reject { note } => Action::Reject { note },
            ActionCommand::Print => Action::Print,
            ActionCommand::Reprint => Action::Reprint,
        }
    }
}

pub async fn execute(desk: Desk, args: ApplyArgs) -> Result<()> {
    let action = args.action.into_action(args.id);

    let plan = match desk.service.preview(args.id, action) {
        Ok(plan) => plan,
        Err(e) => {
            let notice = Notice::from_error(&e);
            eprintln!("🛑 {}", notice.message);
            return Err(e.into());
        }
    };
    println!("❓ {}", plan.confirmation);

    let outcome = match desk.service.perform(args.id, plan.action).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("🛑 {}", Notice::from_error(&e).message);
            return Err(e.into());
        }
    };

    println!("✅ {}", outcome.notice.message);
    println!("   Status: {}", status_label(outcome.request.status));
    if outcome.opens_editor() {
        println!("📝 Next: open the document editor for request {}", outcome.request.id);
    }

    desk.close();
    Ok(())
}
