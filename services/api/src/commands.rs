use crate::cli::RemoteArgs;
use crate::infra::remote_client;
use clap::Args;
use scorecard::error::AppError;
use scorecard::evaluation::{
    EvaluationField, EvaluationId, EvaluationSession, EvaluationStore,
    EvaluationSummary, ItemId, SaveStatus, StoredEvaluation,
};
use tracing::warn;

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// Field edit in the form <item-id>.<ratio|score|bonus>=<value>; repeatable
    #[arg(long = "set", value_name = "EDIT")]
    pub(crate) edits: Vec<String>,
    /// Save the result as a new evaluation
    #[arg(long, conflicts_with = "update")]
    pub(crate) save: bool,
    /// Overwrite an existing evaluation with the result
    #[arg(long, value_name = "ID")]
    pub(crate) update: Option<String>,
    #[command(flatten)]
    pub(crate) remote: RemoteArgs,
}

#[derive(Args, Debug)]
pub(crate) struct RecordArgs {
    /// Evaluation id assigned by the server
    pub(crate) id: String,
    #[command(flatten)]
    pub(crate) remote: RemoteArgs,
}

/// A parsed `--set` argument. The value stays raw so the session applies its own coercion.
#[derive(Debug, PartialEq)]
pub(crate) struct FieldEdit {
    pub(crate) item_id: ItemId,
    pub(crate) field: EvaluationField,
    pub(crate) raw_value: String,
}

pub(crate) fn parse_edit(raw: &str) -> Result<FieldEdit, AppError> {
    let (target, value) = raw
        .split_once('=')
        .ok_or_else(|| AppError::InvalidEdit(format!("'{raw}' is missing '='")))?;
    let (item, field) = target.split_once('.').ok_or_else(|| {
        AppError::InvalidEdit(format!("'{raw}' must name <item-id>.<field>"))
    })?;

    let item_id = item
        .trim()
        .parse::<u32>()
        .map(ItemId)
        .map_err(|_| AppError::InvalidEdit(format!("'{item}' is not an item id")))?;
    let field = field.parse::<EvaluationField>().map_err(AppError::InvalidEdit)?;

    Ok(FieldEdit {
        item_id,
        field,
        raw_value: value.to_string(),
    })
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        edits,
        save,
        update,
        remote,
    } = args;

    let edits = edits
        .iter()
        .map(|raw| parse_edit(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut session = EvaluationSession::default();
    for edit in &edits {
        if !session.edit_field(edit.item_id, edit.field, &edit.raw_value) {
            warn!(item = %edit.item_id, "no criterion with this id; edit skipped");
        }
    }

    println!("{}", render_summary(&session.summary()));

    if !save && update.is_none() {
        return Ok(());
    }

    let client = remote_client(remote)?;
    let status = match update {
        Some(id) => session.request_update(&client, &EvaluationId(id)).await,
        None => session.request_save(&client).await,
    };

    match status {
        SaveStatus::Succeeded(message) => {
            println!("\n{message}");
            Ok(())
        }
        SaveStatus::Failed(message) => Err(AppError::SaveFailed(message.clone())),
        SaveStatus::Idle | SaveStatus::Saving => Ok(()),
    }
}

pub(crate) async fn run_list(args: RemoteArgs) -> Result<(), AppError> {
    let client = remote_client(args)?;
    let records = client.list().await?;

    if records.is_empty() {
        println!("No saved evaluations");
        return Ok(());
    }

    println!("{:<10} {:>12}  Evaluated at", "ID", "Total score");
    for stored in &records {
        println!(
            "{:<10} {:>12.2}  {}",
            stored.id_label(),
            stored.record.total_score,
            stored.record.evaluated_at.to_rfc3339()
        );
    }
    Ok(())
}

pub(crate) async fn run_show(args: RecordArgs) -> Result<(), AppError> {
    let client = remote_client(args.remote)?;
    let stored = client.fetch(&EvaluationId(args.id)).await?;

    println!("{}", render_stored(&stored));
    Ok(())
}

pub(crate) async fn run_delete(args: RecordArgs) -> Result<(), AppError> {
    let client = remote_client(args.remote)?;
    let id = EvaluationId(args.id);
    let confirmation = client.delete(&id).await?;

    match confirmation.get("message").and_then(|value| value.as_str()) {
        Some(message) => println!("{message}"),
        None => println!("evaluation {id} deleted"),
    }
    Ok(())
}

fn render_stored(stored: &StoredEvaluation) -> String {
    let summary = EvaluationSummary::from_items(&stored.record.items);
    format!(
        "Evaluation {} (evaluated {})\n{}\nRecorded total: {:.2}",
        stored.id_label(),
        stored.record.evaluated_at.to_rfc3339(),
        render_summary(&summary),
        stored.record.total_score
    )
}

pub(crate) fn render_summary(summary: &EvaluationSummary) -> String {
    let mut lines = Vec::with_capacity(summary.items.len() + 4);
    let ratio_flag = if summary.ratio_valid { "ok" } else { "must be 100%" };
    lines.push(format!(
        "Total ratio: {}% ({ratio_flag})",
        summary.total_ratio
    ));
    lines.push(format!("Total score: {}", summary.display_total()));
    lines.push(String::new());
    lines.push(format!(
        "{:<4} {:<26} {:>9} {:>7} {:>7} {:>9}",
        "ID", "Criterion", "Ratio (%)", "Score", "Bonus", "Weighted"
    ));
    for item in &summary.items {
        lines.push(format!(
            "{:<4} {:<26} {:>9} {:>7} {:>7} {:>9.2}",
            item.id.0, item.name, item.ratio, item.score, item.bonus, item.final_score
        ));
    }
    lines.join("\n")
}
