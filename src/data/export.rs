use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;

use super::model::{HEADER, WorkingSet};
use crate::config::OutputFormat;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write the cleaned table in `format`, to `output` or to stdout.
///
/// Parquet is binary and always needs an output path.
pub fn export(ws: &WorkingSet, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    match (format, output) {
        (OutputFormat::Parquet, Some(path)) => write_parquet(ws, path)?,
        (OutputFormat::Parquet, None) => bail!("Parquet output needs --output <path>"),
        (_, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_text(ws, format, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("writing {}", path.display()))?;
        }
        (_, None) => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_text(ws, format, &mut writer)?;
            writer.flush().context("writing to stdout")?;
        }
    }

    match output {
        Some(path) => info!("wrote {} rows as {format} to {}", ws.len(), path.display()),
        None => info!("wrote {} rows as {format} to stdout", ws.len()),
    }
    Ok(())
}

/// Write any of the text formats to `writer`.
pub fn write_text<W: Write>(ws: &WorkingSet, format: OutputFormat, writer: W) -> Result<()> {
    match format {
        OutputFormat::Tsv => write_tsv(ws, writer),
        OutputFormat::Csv => write_csv(ws, writer),
        OutputFormat::Json => write_json(ws, writer),
        OutputFormat::Parquet => bail!("Parquet is not a text format"),
    }
}

// ---------------------------------------------------------------------------
// Text writers
// ---------------------------------------------------------------------------

/// The `.las`-style tab-delimited table.
pub fn write_tsv<W: Write>(ws: &WorkingSet, mut writer: W) -> Result<()> {
    writer
        .write_all(ws.to_text().as_bytes())
        .context("writing TSV")?;
    Ok(())
}

/// Same header and columns as the TSV table, comma-separated.
pub fn write_csv<W: Write>(ws: &WorkingSet, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER).context("writing CSV header")?;
    for m in ws {
        let mut record = Vec::with_capacity(HEADER.len());
        record.push(m.depth.to_string());
        record.extend(m.channels().iter().map(|v| v.to_string()));
        wtr.write_record(&record)
            .with_context(|| format!("writing CSV row at depth {}", m.depth))?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

/// Records-oriented JSON: `[{"depth": 4000, "rop": 1.0, ...}, ...]`.
pub fn write_json<W: Write>(ws: &WorkingSet, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, ws.as_slice()).context("serializing JSON")?;
    writeln!(writer).context("writing JSON")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

/// Columnar schema: `depth` as Int64, every channel as Float64.
pub fn parquet_schema() -> Schema {
    let mut fields = vec![Field::new("depth", DataType::Int64, false)];
    fields.extend(
        HEADER[1..]
            .iter()
            .map(|name| Field::new(name.to_ascii_lowercase(), DataType::Float64, false)),
    );
    Schema::new(fields)
}

fn to_record_batch(ws: &WorkingSet) -> Result<RecordBatch> {
    let schema = Arc::new(parquet_schema());

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(HEADER.len());
    columns.push(Arc::new(Int64Array::from(ws.depths())));
    for ch in 0..7 {
        let values: Vec<f64> = ws.iter().map(|m| m.channels()[ch]).collect();
        columns.push(Arc::new(Float64Array::from(values)));
    }

    RecordBatch::try_new(schema, columns).context("building record batch")
}

/// Write the table as a single Parquet record batch.
pub fn write_parquet(ws: &WorkingSet, path: &Path) -> Result<()> {
    let batch = to_record_batch(ws)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
