//! ASCII bar charts.
//!
//! The chart contract matches the original rendering collaborator: an
//! ordered label sequence plus one or more same-length numeric series.

const BAR_WIDTH: usize = 32;

/// A named data series aligned with the label sequence.
pub struct Series {
    pub name: &'static str,
    pub data: Vec<u64>,
}

/// Render horizontal bars, one row per label per series.
pub fn render(title: &str, labels: &[String], series: &[Series]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{title}\n"));
    output.push_str(&"=".repeat(60));
    output.push('\n');

    if labels.is_empty() {
        output.push_str("No data available.\n");
        return output;
    }

    let max = series
        .iter()
        .flat_map(|s| s.data.iter().copied())
        .max()
        .unwrap_or(0)
        .max(1);
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let name_width = series.iter().map(|s| s.name.len()).max().unwrap_or(0);

    for (i, label) in labels.iter().enumerate() {
        for (j, s) in series.iter().enumerate() {
            let value = s.data.get(i).copied().unwrap_or(0);
            let bar_len = ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
            // Print the label once per group, on its first row.
            let row_label = if j == 0 { label.as_str() } else { "" };
            if series.len() > 1 {
                output.push_str(&format!(
                    "{row_label:<label_width$}  {:<name_width$}  {:<BAR_WIDTH$} {value}\n",
                    s.name,
                    "#".repeat(bar_len),
                ));
            } else {
                output.push_str(&format!(
                    "{row_label:<label_width$}  {:<BAR_WIDTH$} {value}\n",
                    "#".repeat(bar_len),
                ));
            }
        }
    }
    output
}
