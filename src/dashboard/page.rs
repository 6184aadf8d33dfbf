// The map page: two selectors and a chart region, driven by the update endpoint.

use std::fmt;

use crate::dashboard::*;

pub const PAGE_TITLE: &str = "Global Participation Map";
pub const PLOTLY_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// The content of the page, independent of its HTML rendering.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PageLayout {
    pub title: String,
    pub heading: String,
    pub link: String,
    pub prompt: String,
    pub competition_options: Vec<String>,
    pub default_competition: String,
    pub default_metric: Metric,
    pub graph_height_px: u32,
}

impl PageLayout {
    pub fn new(config: &DashboardConfig) -> PageLayout {
        PageLayout {
            title: PAGE_TITLE.to_string(),
            heading: config.heading.clone(),
            link: config.link.clone(),
            prompt: "Select Competition and Metric:".to_string(),
            competition_options: config.competition_options(),
            default_competition: ALL_COMPETITIONS.to_string(),
            default_metric: Metric::Teams,
            graph_height_px: 650,
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n")?;
        writeln!(f, "<title>{}</title>", esc(&self.title))?;
        writeln!(f, "<script src=\"{}\"></script>", PLOTLY_URL)?;
        f.write_str(STYLE)?;
        f.write_str("</head>\n<body>\n<div id=\"page\">\n")?;

        writeln!(f, "<h2>{}</h2>", esc(&self.heading))?;
        writeln!(
            f,
            "<h3><a href=\"{0}\" target=\"_blank\">{0}</a></h3>",
            esc(&self.link)
        )?;
        writeln!(f, "<div class=\"prompt\">{}</div>", esc(&self.prompt))?;

        f.write_str("<div class=\"selectors\">\n<select id=\"competition-dropdown\">\n")?;
        for competition in self.competition_options.iter() {
            let selected = if *competition == self.default_competition {
                " selected"
            } else {
                ""
            };
            writeln!(
                f,
                "<option value=\"{0}\"{1}>{0}</option>",
                esc(competition),
                selected
            )?;
        }
        f.write_str("</select>\n<select id=\"metric-dropdown\">\n")?;
        // The other metrics are filled in by the first update.
        writeln!(
            f,
            "<option value=\"{:?}\" selected>{}</option>",
            self.default_metric,
            esc(self.default_metric.label())
        )?;
        f.write_str("</select>\n</div>\n")?;

        writeln!(
            f,
            "<div id=\"choropleth-map\" style=\"height: {}px\"></div>",
            self.graph_height_px
        )?;
        f.write_str("</div>\n")?;
        f.write_str(SCRIPT)?;
        f.write_str("</body>\n</html>\n")
    }
}

/// Minimal HTML escaping for text and attribute values.
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"<style>
#page { padding: 20px; font-family: Roboto, Arial, sans-serif; color: #2c3e50; }
h2, h3 { text-align: center; }
.prompt { margin-top: 20px; margin-bottom: 5px; }
.selectors { margin-bottom: 20px; }
.selectors select { width: 250px; margin-right: 20px; }
</style>
"#;

const SCRIPT: &str = r#"<script>
const competition = document.getElementById('competition-dropdown');
const metric = document.getElementById('metric-dropdown');

async function refresh() {
  const params = new URLSearchParams({competition: competition.value, metric: metric.value});
  const resp = await fetch('/api/update?' + params.toString());
  if (!resp.ok) {
    console.error('update failed', resp.status);
    return;
  }
  const update = await resp.json();
  metric.replaceChildren(...update.metric_options.map((opt) => {
    const o = document.createElement('option');
    o.value = opt.value;
    o.textContent = opt.label;
    return o;
  }));
  metric.value = update.metric;
  Plotly.react('choropleth-map', update.figure.data, update.figure.layout);
}

competition.addEventListener('change', refresh);
metric.addEventListener('change', refresh);
refresh();
</script>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_lists_competitions() {
        let html = PageLayout::new(&DashboardConfig::default()).render();
        assert!(html.contains("<title>Global Participation Map</title>"));
        assert!(html.contains("<option value=\"All Competitions\" selected>"));
        assert!(html.contains("<option value=\"CDC-TF 2025\">CDC-TF 2025</option>"));
        assert!(html.contains("<option value=\"Teams\" selected>Number of Teams</option>"));
        assert!(html.contains("id=\"choropleth-map\" style=\"height: 650px\""));
        assert!(html.contains(PLOTLY_URL));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn text_is_escaped() {
        let config = DashboardConfig::new(&["R&D <1>".to_string()])
            .unwrap()
            .with_heading("\"Quoted\" league", "https://example.org/?a=1&b=2");
        let html = PageLayout::new(&config).render();
        assert!(html.contains("<option value=\"R&amp;D &lt;1&gt;\">R&amp;D &lt;1&gt;</option>"));
        assert!(html.contains("<h2>&quot;Quoted&quot; league</h2>"));
        assert!(html.contains("href=\"https://example.org/?a=1&amp;b=2\""));
    }
}
