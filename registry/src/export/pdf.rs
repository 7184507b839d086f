use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};
use thiserror::Error;

use crate::{consts::consts::FOUNDATION_NAME, model::registration::Registration};

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const HEADER_HEIGHT: f64 = 45.0;
const LABEL_X: f64 = 20.0;
const VALUE_X: f64 = 75.0;
const FIRST_ROW_Y: f64 = 60.0;
const ROW_SPACING: f64 = 10.0;
const FOOTER_Y: f64 = 270.0;

// Average Helvetica advance as a share of the font size, close enough to centre a line
const HELVETICA_AVERAGE_ADVANCE: f64 = 0.5;
const PT_TO_MM: f64 = 0.352_778;

pub const FOOTER_NOTE: &str = "Please upload this form to complete your registration.";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unable to render registration form: {0}")]
    Render(#[from] printpdf::Error),
}

/// A rendered registration form, ready to download
#[derive(Debug, Clone, PartialEq)]
pub struct PdfExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn file_name(registration: &Registration) -> String {
    format!(
        "HopeRise_Registration_{}_{}.pdf",
        sanitize(&registration.first_name),
        sanitize(&registration.last_name)
    )
}

/// Label and value for each row of the form, in print order
pub fn form_rows(registration: &Registration) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Registration ID", registration.id.to_string()),
        ("First Name", registration.first_name.clone()),
        (
            "Middle Name",
            registration
                .middle_name
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        ("Last Name", registration.last_name.clone()),
        ("Age", registration.age.to_string()),
        ("Country", registration.country.clone()),
        ("Address", registration.address.clone()),
        ("Phone Number", registration.phone.clone()),
        ("Date of Registration", registration.registered_on()),
    ];

    if let Some(gender) = registration.gender {
        rows.push(("Gender", gender.label().to_string()));
    }

    rows
}

// printpdf measures from the bottom left, the layout is written from the top
fn from_top(y: f64) -> Mm {
    Mm(PAGE_HEIGHT - y)
}

fn centred_x(text: &str, font_size: f64) -> Mm {
    let width = text.chars().count() as f64 * font_size * HELVETICA_AVERAGE_ADVANCE * PT_TO_MM;

    Mm(((PAGE_WIDTH - width) / 2.0).max(0.0))
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f64 / 255.0,
        g as f64 / 255.0,
        b as f64 / 255.0,
        None,
    ))
}

fn draw_header_band(layer: &PdfLayerReference) {
    let points = vec![
        (Point::new(Mm(0.0), from_top(0.0)), false),
        (Point::new(Mm(PAGE_WIDTH), from_top(0.0)), false),
        (Point::new(Mm(PAGE_WIDTH), from_top(HEADER_HEIGHT)), false),
        (Point::new(Mm(0.0), from_top(HEADER_HEIGHT)), false),
    ];

    let band = Line {
        points,
        is_closed: true,
        has_fill: true,
        has_stroke: false,
        is_clipping_path: false,
    };

    layer.set_fill_color(rgb(26, 42, 68));
    layer.add_shape(band);
}

fn write_centred(layer: &PdfLayerReference, text: &str, font_size: f64, y: f64, font: &IndirectFontRef) {
    layer.use_text(text, font_size, centred_x(text, font_size), from_top(y), font);
}

/// Renders the single page form for a registrant
#[tracing::instrument(skip(registration), fields(id = %registration.id))]
pub fn export_registration(registration: &Registration) -> Result<PdfExport, ExportError> {
    let (document, page, layer) = PdfDocument::new(
        format!("{} Registration Form", FOUNDATION_NAME),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Form",
    );

    let regular = document.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = document.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let layer = document.get_page(page).get_layer(layer);

    draw_header_band(&layer);

    layer.set_fill_color(rgb(255, 255, 255));
    write_centred(&layer, FOUNDATION_NAME, 22.0, 20.0, &bold);
    write_centred(&layer, "Registration Form", 12.0, 32.0, &regular);

    layer.set_fill_color(rgb(40, 40, 40));

    for (i, (label, value)) in form_rows(registration).iter().enumerate() {
        let y = FIRST_ROW_Y + i as f64 * ROW_SPACING;

        layer.use_text(format!("{}:", label), 11.0, Mm(LABEL_X), from_top(y), &bold);
        layer.use_text(value.as_str(), 11.0, Mm(VALUE_X), from_top(y), &regular);
    }

    layer.set_fill_color(rgb(120, 120, 120));
    write_centred(&layer, FOOTER_NOTE, 9.0, FOOTER_Y, &regular);

    let bytes = document.save_to_bytes()?;

    Ok(PdfExport {
        file_name: file_name(registration),
        bytes,
    })
}

/// Export for whoever is on the success view, nothing to do without a registrant
pub fn export_current(current: Option<&Registration>) -> Result<Option<PdfExport>, ExportError> {
    current.map(export_registration).transpose()
}
