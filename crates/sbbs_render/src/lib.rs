use std::fmt::Write as _;

use sbbs_core::core_api::{CoreError, CoreErrorCode, TeamExport};
use sbbs_core::sbbs::ability::PitcherAbility;
use sbbs_core::sbbs::logo::Bitmap;
use sbbs_core::sbbs::team::Team;
use serde_json::Value as JsonValue;

const NAME_COL_WIDTH: usize = 6;

pub fn team_to_json(team: &TeamExport) -> Result<JsonValue, CoreError> {
    serde_json::to_value(team).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Schema,
            format!("failed to serialize team \"{}\": {e}", team.name.trim_end()),
        )
    })
}

/// Pretty-printed team record, keys in interchange order.
pub fn render_team_json(team: &TeamExport) -> Result<String, CoreError> {
    let value = team_to_json(team)?;
    serde_json::to_string_pretty(&value)
        .map_err(|e| CoreError::new(CoreErrorCode::Schema, format!("failed to render JSON: {e}")))
}

pub fn render_teams_json(teams: &[TeamExport]) -> Result<String, CoreError> {
    let values = teams
        .iter()
        .map(team_to_json)
        .collect::<Result<Vec<_>, _>>()?;
    serde_json::to_string_pretty(&JsonValue::Array(values))
        .map_err(|e| CoreError::new(CoreErrorCode::Schema, format!("failed to render JSON: {e}")))
}

pub fn parse_team_json(text: &str) -> Result<TeamExport, CoreError> {
    serde_json::from_str(text)
        .map_err(|e| CoreError::new(CoreErrorCode::Schema, format!("invalid team record: {e}")))
}

pub fn encode_logo_png(bitmap: &Bitmap) -> Result<Vec<u8>, CoreError> {
    let png_error = |e: png::EncodingError| {
        CoreError::new(CoreErrorCode::Encoding, format!("PNG encode error: {e}"))
    };

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, bitmap.width() as u32, bitmap.height() as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(png_error)?;
    writer
        .write_image_data(&bitmap.to_rgba())
        .map_err(png_error)?;
    writer.finish().map_err(png_error)?;
    Ok(out)
}

/// Decode an 8-bit RGB or RGBA PNG (palette images are expanded first).
/// RGB pixels come back fully opaque.
pub fn decode_logo_png(bytes: &[u8]) -> Result<Bitmap, CoreError> {
    let png_error = |e: png::DecodingError| {
        CoreError::new(CoreErrorCode::Encoding, format!("PNG decode error: {e}"))
    };

    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info().map_err(png_error)?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(png_error)?;
    let buf = &buf[..frame.buffer_size()];

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(CoreError::new(
            CoreErrorCode::Encoding,
            format!("unsupported PNG bit depth {:?}, expected 8", frame.bit_depth),
        ));
    }

    let width = frame.width as usize;
    let height = frame.height as usize;
    let rgba: Vec<u8> = match frame.color_type {
        png::ColorType::Rgba => buf.to_vec(),
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 0xFF])
            .collect(),
        other => {
            return Err(CoreError::new(
                CoreErrorCode::Encoding,
                format!("unsupported PNG color type {other:?}, expected RGB or RGBA"),
            ));
        }
    };

    Bitmap::from_rgba(width, height, &rgba)
}

/// Plain-text roster: fielders with position and batting line, then pitchers.
pub fn render_team_listing(team: &Team) -> String {
    let mut out = String::new();
    writeln!(out, "Team {}: {}", team.index(), team.name.trim_end())
        .expect("writing to String cannot fail");
    writeln!(
        out,
        "  {:>2}  {:<3} {:<w$} {:<1}  {:>4}  {:>2}  {:>3}  {:>3}  {:>3}  {:>3}  ABILITY",
        "#",
        "POS",
        "NAME",
        "B",
        "AVG",
        "HR",
        "RUN",
        "THR",
        "FLD",
        "ST",
        w = NAME_COL_WIDTH
    )
    .expect("writing to String cannot fail");

    for assignment in team.fielders() {
        let player = &assignment.player;
        let Some(stats) = player.batting() else {
            continue;
        };
        writeln!(
            out,
            "  {:>2}  {:<3} {:<w$} {:<1}  {:>4}  {:>2}  {:>3}  {:>3}  {:>3}  {:>3}  {}",
            assignment.number,
            assignment.position.abbreviation(),
            player.name.trim_end(),
            player.handedness,
            format_average(stats.average),
            stats.home_runs,
            stats.running,
            stats.throwing,
            stats.fielding,
            stats.stamina,
            stats.ability,
            w = NAME_COL_WIDTH
        )
        .expect("writing to String cannot fail");
    }

    writeln!(out).expect("writing to String cannot fail");
    writeln!(
        out,
        "  {:>2}  {:<w$} {:>4}  {:>3}  {:>3}  {:>3}  {:>3}  {:>3}  PITCHES",
        "#",
        "NAME",
        "ERA",
        "SPD",
        "R",
        "L",
        "FLD",
        "ST",
        w = NAME_COL_WIDTH
    )
    .expect("writing to String cannot fail");

    for assignment in team.pitchers() {
        let player = &assignment.player;
        let Some(stats) = player.pitching() else {
            continue;
        };
        writeln!(
            out,
            "  {:>2}  {:<w$} {:>4}  {:>3}  {:>3}  {:>3}  {:>3}  {:>3}  {}",
            assignment.number,
            player.name.trim_end(),
            format_era(stats.era),
            stats.speed,
            stats.pitch_right,
            stats.pitch_left,
            stats.fielding,
            stats.stamina,
            format_pitches(&stats.abilities),
            w = NAME_COL_WIDTH
        )
        .expect("writing to String cannot fail");
    }

    out
}

fn format_average(thousandths: u16) -> String {
    if thousandths >= 1000 {
        return "1.000".to_string();
    }
    format!(".{thousandths:03}")
}

fn format_era(hundredths: u16) -> String {
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

fn format_pitches(abilities: &[PitcherAbility]) -> String {
    let names: Vec<&str> = abilities
        .iter()
        .filter(|&&a| a != PitcherAbility::Nothing)
        .map(PitcherAbility::as_str)
        .collect();
    if names.is_empty() {
        return "-".to_string();
    }
    names.join(", ")
}
