//! SVG price chart: close line plus 5/20/60/120-day moving averages

use crate::api::PriceBar;
use crate::error::Result;
use crate::format::format_number;
use crate::indicators::{MA_PERIODS, moving_average};
use std::path::{Path, PathBuf};
use tracing::debug;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 450.0;
const PAD_LEFT: f64 = 80.0;
const PAD_RIGHT: f64 = 110.0;
const PAD_TOP: f64 = 50.0;
const PAD_BOTTOM: f64 = 80.0;
const DATE_LABELS: usize = 6;

const CLOSE_STYLE: (&str, &str, f64) = ("종가", "blue", 2.5);
const MA_STYLES: [(&str, &str); 4] = [
    ("5일", "red"),
    ("20일", "green"),
    ("60일", "orange"),
    ("120일", "purple"),
];

fn push_line(svg: &mut String, element: &str) {
    svg.push_str(element);
    svg.push('\n');
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

struct Plot {
    min: f64,
    max: f64,
    count: usize,
}

impl Plot {
    fn x(&self, i: usize) -> f64 {
        let width = WIDTH - PAD_LEFT - PAD_RIGHT;
        if self.count > 1 {
            PAD_LEFT + i as f64 * width / (self.count - 1) as f64
        } else {
            PAD_LEFT + width / 2.0
        }
    }

    fn y(&self, value: f64) -> f64 {
        let height = HEIGHT - PAD_TOP - PAD_BOTTOM;
        let range = self.max - self.min;
        if range > 0.0 {
            HEIGHT - PAD_BOTTOM - (value - self.min) * height / range
        } else {
            HEIGHT - PAD_BOTTOM - height / 2.0
        }
    }

    fn polyline(&self, series: &[Option<f64>], color: &str, stroke_width: f64) -> String {
        let points: Vec<String> = series
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| format!("{:.1},{:.1}", self.x(i), self.y(v))))
            .collect();

        if points.is_empty() {
            return String::new();
        }
        format!(
            r#"<polyline fill="none" stroke="{color}" stroke-width="{stroke_width}" points="{}"/>"#,
            points.join(" ")
        )
    }
}

/// Render the chart as a standalone SVG document
///
/// Moving averages only start once their window is full. An empty history
/// renders a placeholder.
pub fn render_price_chart(title: &str, bars: &[PriceBar]) -> String {
    let title = escape_xml(title);
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">
<rect width="100%" height="100%" fill="white"/>
<text x="{}" y="30" text-anchor="middle" font-size="18">{title}</text>
"#,
        WIDTH / 2.0
    );

    if bars.is_empty() {
        push_line(
            &mut svg,
            &format!(
                r#"<text x="{}" y="{}" text-anchor="middle" font-size="14" fill="gray">데이터 없음</text>"#,
                WIDTH / 2.0,
                HEIGHT / 2.0
            ),
        );
        svg.push_str("</svg>\n");
        return svg;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let averages: Vec<Vec<Option<f64>>> = MA_PERIODS
        .iter()
        .map(|&period| moving_average(&closes, period))
        .collect();

    let (min, max) = closes
        .iter()
        .copied()
        .chain(averages.iter().flatten().flatten().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let plot = Plot {
        min,
        max,
        count: bars.len(),
    };

    // axes
    push_line(
        &mut svg,
        &format!(
            r#"<g stroke="black" stroke-width="1"><line x1="{PAD_LEFT}" y1="{PAD_TOP}" x2="{PAD_LEFT}" y2="{bottom}"/><line x1="{PAD_LEFT}" y1="{bottom}" x2="{right}" y2="{bottom}"/></g>"#,
            bottom = HEIGHT - PAD_BOTTOM,
            right = WIDTH - PAD_RIGHT,
        ),
    );

    for value in [max, min] {
        push_line(
            &mut svg,
            &format!(
                r#"<text x="{}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
                PAD_LEFT - 6.0,
                plot.y(value) + 4.0,
                format_number(value, 2)
            ),
        );
    }

    let step = (bars.len() / DATE_LABELS).max(1);
    for (i, bar) in bars.iter().enumerate().step_by(step) {
        let x = plot.x(i);
        let y = HEIGHT - PAD_BOTTOM + 14.0;
        push_line(
            &mut svg,
            &format!(
                r#"<text x="{x:.1}" y="{y:.1}" font-size="10" text-anchor="end" transform="rotate(-45 {x:.1} {y:.1})">{}</text>"#,
                bar.timestamp.format("%Y-%m-%d")
            ),
        );
    }

    let closes_series: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    let (close_label, close_color, close_width) = CLOSE_STYLE;
    let mut legend = vec![(close_label, close_color)];
    push_line(&mut svg, &plot.polyline(&closes_series, close_color, close_width));

    for (series, (label, color)) in averages.iter().zip(MA_STYLES) {
        let line = plot.polyline(series, color, 1.2);
        if !line.is_empty() {
            push_line(&mut svg, &line);
        }
        legend.push((label, color));
    }

    let legend_x = WIDTH - PAD_RIGHT + 15.0;
    for (row, (label, color)) in legend.iter().enumerate() {
        let y = PAD_TOP + 10.0 + row as f64 * 20.0;
        push_line(
            &mut svg,
            &format!(
                r#"<line x1="{legend_x}" y1="{y}" x2="{}" y2="{y}" stroke="{color}" stroke-width="3"/><text x="{}" y="{}" font-size="12">{label}</text>"#,
                legend_x + 20.0,
                legend_x + 26.0,
                y + 4.0
            ),
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Write `svg` to `{dir}/{ticker}.svg`, creating `dir` if needed
pub fn save_chart(dir: &Path, ticker: &str, svg: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let file_name: String = ticker
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    let path = dir.join(format!("{file_name}.svg"));
    std::fs::write(&path, svg)?;
    debug!("Chart written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::bars;

    #[test]
    fn test_empty_history_placeholder() {
        let svg = render_price_chart("빈 차트", &[]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("데이터 없음"));
        assert!(!svg.contains("<polyline"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_short_history_draws_close_and_ma5_only() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let svg = render_price_chart("삼성전자 주가 차트", &bars(&closes));

        assert!(svg.contains("삼성전자 주가 차트"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(r#"stroke="blue" stroke-width="2.5""#));
        assert!(svg.contains(r#"<polyline fill="none" stroke="red""#));
        assert!(!svg.contains(r#"<polyline fill="none" stroke="green""#));
        for label in ["종가", "5일", "20일", "60일", "120일"] {
            assert!(svg.contains(&format!(">{label}</text>")));
        }
        assert!(svg.contains("rotate(-45"));
        assert!(svg.contains("2024-01-02"));
    }

    #[test]
    fn test_long_history_draws_all_series() {
        let closes: Vec<f64> = (0..130).map(|i| 100.0 + f64::from(i % 7)).collect();
        let svg = render_price_chart("AAPL", &bars(&closes));
        assert_eq!(svg.matches("<polyline").count(), 5);
    }

    #[test]
    fn test_one_element_per_line() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let svg = render_price_chart("라인", &bars(&closes));
        let lines: Vec<&str> = svg.lines().collect();

        assert!(lines.iter().any(|l| l.starts_with("<g stroke=\"black\"")));
        assert_eq!(lines.iter().filter(|l| l.starts_with("<polyline")).count(), 2);
        assert_eq!(lines.iter().filter(|l| l.starts_with("<line x1=")).count(), 5);
        assert_eq!(lines.last(), Some(&"</svg>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let svg = render_price_chart("AT&T <chart>", &bars(&[1.0]));
        assert!(svg.contains("AT&amp;T &lt;chart&gt;"));
    }

    #[test]
    fn test_save_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_chart(&dir.path().join("charts"), "005930.KS", "<svg/>").unwrap();
        assert_eq!(path.file_name().unwrap(), "005930.KS.svg");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<svg/>");

        let odd = save_chart(dir.path(), "^KS11", "<svg/>").unwrap();
        assert_eq!(odd.file_name().unwrap(), "_KS11.svg");
    }
}
