// Chart renderer - plotly line chart and the dashboard page around it
use crate::application::chart_service::{ChartView, DisplayState, ErrorKind};
use crate::domain::reading::RgbColor;
use crate::domain::time_format::{AXIS_TIME_FORMAT, format_axis_time};
use plotly::color::Rgb;
use plotly::common::{Line, Marker, Mode, Title};
use plotly::layout::{Axis, AxisType};
use plotly::{Layout, Plot, Scatter};

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";
const CHART_DIV_ID: &str = "aurora-chart";
const LINE_COLOR: RgbColor = RgbColor::new(0x82, 0xCA, 0x9D);
const MARKER_SIZE: usize = 10;

fn rgb(color: RgbColor) -> Rgb {
    Rgb::new(color.r, color.g, color.b)
}

/// Builds the plot for a chart. Returns `None` when there is nothing to draw,
/// in which case the page shows its "no data" state instead.
pub fn build_plot(view: &ChartView) -> Option<Plot> {
    let scale = view.scale?;
    if !view.has_data() {
        return None;
    }

    let times: Vec<i64> = view.points.iter().map(|p| p.time_millis).collect();
    let values: Vec<f64> = view.points.iter().map(|p| p.value).collect();
    let colors: Vec<Rgb> = view.points.iter().map(|p| rgb(p.color)).collect();
    let labels: Vec<String> = view
        .points
        .iter()
        .map(|p| format_axis_time(p.time_millis))
        .collect();

    let trace = Scatter::new(times, values)
        .name("Activity")
        .mode(Mode::LinesMarkers)
        .line(Line::new().color(rgb(LINE_COLOR)))
        .marker(Marker::new().size(MARKER_SIZE).color_array(colors))
        .text_array(labels);

    let layout = Layout::new()
        .height(400)
        .show_legend(false)
        .x_axis(
            Axis::new()
                .type_(AxisType::Date)
                .tick_format(AXIS_TIME_FORMAT)
                .tick_angle(-45.0),
        )
        .y_axis(
            Axis::new()
                .title(Title::with_text("Activity (nT)"))
                .range(scale.range.to_vec())
                .tick_values(scale.ticks.to_vec()),
        );

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    Some(plot)
}

/// Renders the whole dashboard page for the current display state.
pub fn render_page(state: &DisplayState, user: Option<&str>) -> String {
    let mut body = String::new();

    match user {
        Some(user) => {
            body.push_str(&format!(
                "<p>Signed in as <strong>{}</strong> \
                 <button onclick=\"refreshChart()\">Refresh</button> \
                 <button onclick=\"signOut()\">Sign out</button></p>\n",
                escape_html(user)
            ));
        }
        None => body.push_str(SIGN_IN_FORM),
    }

    if let Some(error) = &state.error {
        let (class, hint) = match error.kind {
            ErrorKind::Auth => ("error auth", " Please sign in again."),
            ErrorKind::Fetch => ("error fetch", ""),
        };
        body.push_str(&format!(
            "<div class=\"{}\">{}{}</div>\n",
            class,
            escape_html(&error.message),
            hint
        ));
    }

    match state.chart.as_ref() {
        Some(view) => match build_plot(view) {
            Some(plot) => {
                body.push_str(&plot.to_inline_html(Some(CHART_DIV_ID)));
                body.push_str(&format!(
                    "\n<p class=\"diagnostics\">{} readings over the last {} day(s), {} dropped</p>\n",
                    view.retained, view.window_days, view.dropped
                ));
            }
            None => body.push_str("<p class=\"no-data\">No data for the selected window.</p>\n"),
        },
        None if user.is_some() => {
            body.push_str("<p class=\"no-data\">No readings loaded yet. Press Refresh.</p>\n")
        }
        None => {}
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Aurora activity</title>\n\
         <script src=\"{}\"></script>\n<style>{}</style>\n</head>\n<body>\n<h1>Aurora activity</h1>\n\
         {}<script>{}</script>\n</body>\n</html>\n",
        PLOTLY_JS, PAGE_STYLE, body, PAGE_SCRIPT
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const SIGN_IN_FORM: &str = "<form onsubmit=\"signIn(event)\">\
<input name=\"username\" placeholder=\"Username\" required> \
<input name=\"password\" type=\"password\" placeholder=\"Password\"> \
<button type=\"submit\">Sign in</button></form>\n";

const PAGE_STYLE: &str = "body{font-family:sans-serif;margin:2em}\
.error{padding:.5em;margin:1em 0;border:1px solid #c00;color:#c00}\
.no-data,.diagnostics{color:#666}";

const PAGE_SCRIPT: &str = r#"
async function signIn(event) {
  event.preventDefault();
  const form = new FormData(event.target);
  await fetch('/session', {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({username: form.get('username'), password: form.get('password')})
  });
  location.reload();
}
async function signOut() {
  await fetch('/session', {method: 'DELETE'});
  location.reload();
}
async function refreshChart() {
  await fetch('/refresh', {method: 'POST'});
  location.reload();
}
"#;
