use clap::Args;
use anyhow::Result;

use records_core::release::release_date_label;
use records_core::status_label;

use crate::commands::Desk;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive search over student name, id number, document type and status
    #[arg(short, long, default_value = "")]
    pub query: String,
}

pub async fn execute(desk: Desk, args: ListArgs) -> Result<()> {
    let requests = desk.service.queue(&args.query);

    if requests.is_empty() {
        println!("No requests match '{}'.", args.query);
        desk.close();
        return Ok(());
    }

    println!(
        "{:<36}  {:<24} {:<12} {:<16} {:<18} {:>10}  {}",
        "ID", "STUDENT", "ID NUMBER", "DOCUMENT", "STATUS", "AMOUNT", "RELEASED"
    );
    println!("{:-<140}", "-");

    for request in &requests {
        let amount = request
            .amount
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<36}  {:<24} {:<12} {:<16} {:<18} {:>10}  {}",
            request.id,
            request.student.full_name(),
            request.student.id_number,
            request.document_type,
            status_label(request.status),
            amount,
            release_date_label(request),
        );
    }

    println!("{} request(s)", requests.len());
    desk.close();
    Ok(())
}
