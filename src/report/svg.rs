//! Four-panel SVG rendering
//!
//! Layout is a 2x2 grid: waveforms on the top row, spectra on the bottom,
//! original on the left and resynthesized on the right. Both panels of a
//! row share their vertical scale. Spectrum panels use a log10 frequency
//! axis, which leaves out bin 0 (0 Hz).

use crate::analysis::Spectrum;
use crate::buffer::SampleBuffer;

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 800.0;
const MARGIN: f64 = 60.0;
const GAP: f64 = 70.0;
const ORIGINAL_COLOUR: &str = "#1f77b4";
const RESYNTH_COLOUR: &str = "#d62728";

#[derive(Debug, Clone, Copy)]
struct Panel {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Panel {
    fn grid(row: usize, col: usize) -> Self {
        let w = (WIDTH - 2.0 * MARGIN - GAP) / 2.0;
        let h = (HEIGHT - 2.0 * MARGIN - GAP) / 2.0;
        Panel {
            x: MARGIN + col as f64 * (w + GAP),
            y: MARGIN + row as f64 * (h + GAP),
            w,
            h,
        }
    }

    /// Map unit coordinates (0..1, bottom-up) into the panel
    fn point(&self, u: f64, v: f64) -> (f64, f64) {
        (self.x + u * self.w, self.y + (1.0 - v) * self.h)
    }
}

/// Render the four-panel comparison as an SVG document
pub fn render(
    original: &SampleBuffer,
    resynthesized: &SampleBuffer,
    original_spectrum: &Spectrum,
    resynthesized_spectrum: &Spectrum,
) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"12\">\n",
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        "<rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
        WIDTH, HEIGHT
    ));

    let amp_limit = amplitude_limit(&[original, resynthesized]);
    waveform_panel(
        &mut svg,
        Panel::grid(0, 0),
        "Original waveform",
        original,
        amp_limit,
        ORIGINAL_COLOUR,
    );
    waveform_panel(
        &mut svg,
        Panel::grid(0, 1),
        "Resynthesized waveform",
        resynthesized,
        amp_limit,
        RESYNTH_COLOUR,
    );

    let mag_limit = magnitude_limit(&[original_spectrum, resynthesized_spectrum]);
    spectrum_panel(
        &mut svg,
        Panel::grid(1, 0),
        "Original spectrum",
        original_spectrum,
        mag_limit,
        ORIGINAL_COLOUR,
    );
    spectrum_panel(
        &mut svg,
        Panel::grid(1, 1),
        "Resynthesized spectrum",
        resynthesized_spectrum,
        mag_limit,
        RESYNTH_COLOUR,
    );

    svg.push_str("</svg>\n");
    svg
}

fn waveform_panel(
    svg: &mut String,
    panel: Panel,
    title: &str,
    buffer: &SampleBuffer,
    limit: f64,
    colour: &str,
) {
    frame(svg, panel, title, "sample index", "amplitude");

    let n = buffer.len();
    let span = n.saturating_sub(1).max(1) as f64;
    let points = buffer
        .samples()
        .iter()
        .enumerate()
        .map(|(i, &s)| panel.point(i as f64 / span, 0.5 + 0.5 * (s / limit).clamp(-1.0, 1.0)));
    polyline(svg, points, colour);

    // zero line
    let (x0, y0) = panel.point(0.0, 0.5);
    let (x1, _) = panel.point(1.0, 0.5);
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#999\" stroke-dasharray=\"4 3\"/>\n",
        x0, y0, x1, y0
    ));

    axis_label(svg, panel, 0.0, 1.0, &format!("{:.3}", limit), "end");
    axis_label(svg, panel, 0.0, 0.0, &format!("{:.3}", -limit), "end");
    tick_label(svg, panel, 0.0, "0");
    tick_label(svg, panel, 1.0, &n.saturating_sub(1).to_string());
}

fn spectrum_panel(
    svg: &mut String,
    panel: Panel,
    title: &str,
    spectrum: &Spectrum,
    limit: f64,
    colour: &str,
) {
    frame(svg, panel, title, "frequency (Hz, log)", "magnitude");

    let bins = spectrum.bins();
    if bins.len() < 2 {
        return;
    }

    let lo = bins[1].frequency_hz.log10();
    let hi = bins[bins.len() - 1].frequency_hz.log10();
    let span = hi - lo;
    let u_of = |f: f64| {
        if span > 0.0 {
            (f.log10() - lo) / span
        } else {
            0.5
        }
    };

    let points = bins[1..]
        .iter()
        .map(|bin| panel.point(u_of(bin.frequency_hz), (bin.magnitude / limit).clamp(0.0, 1.0)));
    polyline(svg, points, colour);

    axis_label(svg, panel, 0.0, 1.0, &format!("{:.3}", limit), "end");
    axis_label(svg, panel, 0.0, 0.0, "0", "end");

    let mut decade = 10f64.powi(lo.ceil() as i32);
    while decade <= 10f64.powf(hi) {
        tick_label(svg, panel, u_of(decade), &frequency_label(decade));
        decade *= 10.0;
    }
}

fn frame(svg: &mut String, panel: Panel, title: &str, x_label: &str, y_label: &str) {
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"#333\"/>\n",
        panel.x, panel.y, panel.w, panel.h
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"14\" font-weight=\"bold\">{}</text>\n",
        panel.x + panel.w / 2.0,
        panel.y - 10.0,
        title
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>\n",
        panel.x + panel.w / 2.0,
        panel.y + panel.h + 34.0,
        x_label
    ));
    let (lx, ly) = (panel.x - 45.0, panel.y + panel.h / 2.0);
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" transform=\"rotate(-90 {:.2} {:.2})\">{}</text>\n",
        lx, ly, lx, ly, y_label
    ));
}

fn polyline<I>(svg: &mut String, points: I, colour: &str)
where
    I: Iterator<Item = (f64, f64)>,
{
    let coords: Vec<String> = points.map(|(x, y)| format!("{:.2},{:.2}", x, y)).collect();
    if coords.is_empty() {
        return;
    }
    svg.push_str(&format!(
        "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"1\" points=\"{}\"/>\n",
        colour,
        coords.join(" ")
    ));
}

fn axis_label(svg: &mut String, panel: Panel, u: f64, v: f64, text: &str, anchor: &str) {
    let (x, y) = panel.point(u, v);
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\" dominant-baseline=\"middle\">{}</text>\n",
        x - 4.0,
        y,
        anchor,
        text
    ));
}

fn tick_label(svg: &mut String, panel: Panel, u: f64, text: &str) {
    let (x, y) = panel.point(u, 0.0);
    svg.push_str(&format!(
        "<line x1=\"{x:.2}\" y1=\"{y:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"#333\"/>\n",
        y + 5.0
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>\n",
        x,
        y + 18.0,
        text
    ));
}

fn frequency_label(hz: f64) -> String {
    if hz >= 1000.0 {
        format!("{} kHz", hz / 1000.0)
    } else {
        format!("{} Hz", hz)
    }
}

fn amplitude_limit(buffers: &[&SampleBuffer]) -> f64 {
    let peak = buffers
        .iter()
        .flat_map(|b| b.samples().iter())
        .map(|s| s.abs())
        .filter(|s| s.is_finite())
        .fold(0.0_f64, f64::max);
    if peak > 0.0 {
        peak
    } else {
        1.0
    }
}

fn magnitude_limit(spectra: &[&Spectrum]) -> f64 {
    let peak = spectra
        .iter()
        .flat_map(|s| s.bins().iter().skip(1))
        .map(|bin| bin.magnitude)
        .filter(|m| m.is_finite())
        .fold(0.0_f64, f64::max);
    if peak > 0.0 {
        peak
    } else {
        1.0
    }
}
