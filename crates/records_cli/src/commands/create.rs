use clap::Args;
use anyhow::Result;

use records_core::{InitiatedBy, NewDocumentRequest, Role, StudentRef};

use crate::commands::Desk;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Student ID Number (e.g. 2021-00417)
    #[arg(long)]
    pub id_number: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Document Type (e.g. "Transcript", "Certificate")
    #[arg(long)]
    pub document_type: String,

    /// Why the student needs the document
    #[arg(long)]
    pub purpose: String,

    /// Attachment reference; repeat for several
    #[arg(long = "attach")]
    pub attachments: Vec<String>,
}

pub async fn execute(desk: Desk, args: CreateArgs) -> Result<()> {
    let session = desk.service.session()?;

    // Staff open requests on a student's behalf as the registrar.
    let initiated_by = match session.role {
        Role::Student => InitiatedBy::Student,
        _ => InitiatedBy::Registrar,
    };

    println!("🚀 Opening New Request...");
    println!("   Student:  {} {} ({})", args.first_name, args.last_name, args.id_number);
    println!("   Document: {}", args.document_type);

    let new = NewDocumentRequest {
        student: StudentRef {
            id_number: args.id_number,
            first_name: args.first_name,
            last_name: args.last_name,
        },
        document_type: args.document_type,
        purpose: args.purpose,
        initiated_by,
        file_path: args.attachments,
    };

    let (created, warnings) = desk.service.create(new).await?;
    for warning in warnings {
        println!("⚠️  [{}] {}", warning.code, warning.message);
    }

    println!("✅ Request Opened.");
    println!("Request ID: {}", created.id);

    desk.close();
    Ok(())
}
