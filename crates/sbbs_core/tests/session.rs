use std::io::Write;
use std::sync::{Arc, Mutex};

use sbbs_core::core_api::{CoreErrorCode, Engine, Session};
use sbbs_core::handedness::Handedness;
use sbbs_core::sbbs::ability::{FieldPosition, HitterAbility, PitcherAbility};
use sbbs_core::sbbs::logo::Bitmap;
use sbbs_core::layout::RegionId;
use sbbs_core::sbbs::player::{PlayerStats, Role};

const IMAGE_LEN: usize = 0x80000;
const HEADER: usize = 0x7FC0;
const TEAM_BASE: usize = 0x18012;
const PLAYER_BASE: usize = 0x18252;
const LOGO_BASE: usize = 0x58000;

fn team_offset(team: usize) -> usize {
    TEAM_BASE + 0x20 * team
}

fn player_offset(index: usize) -> usize {
    PLAYER_BASE + 24 * index
}

fn fix_checksum(image: &mut [u8]) {
    image[HEADER + 0x1C..HEADER + 0x1E].copy_from_slice(&[0xFF, 0xFF]);
    image[HEADER + 0x1E..HEADER + 0x20].copy_from_slice(&[0x00, 0x00]);
    let sum = image
        .iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)));
    let checksum = (sum & 0xFFFF) as u16;
    image[HEADER + 0x1C..HEADER + 0x1E].copy_from_slice(&(checksum ^ 0xFFFF).to_le_bytes());
    image[HEADER + 0x1E..HEADER + 0x20].copy_from_slice(&checksum.to_le_bytes());
}

/// A LoROM image with a recognizable team 0 and a blank everything else.
fn fixture_image() -> Vec<u8> {
    let mut image = vec![0u8; IMAGE_LEN];
    image[HEADER..HEADER + 21].copy_from_slice(b"baseball simulator   ");
    image[HEADER + 0x17] = 0x09;
    image[HEADER + 0x18] = 0x03;
    image[HEADER + 0x19] = 0x01;

    for team in 0..18 {
        let t = team_offset(team);
        // blank name
        image[t + 3..t + 13].fill(96);
        for slot in 0..12 {
            image[t + 0x0E + slot] = 0x20 | (slot as u8);
        }
        for slot in 0..6 {
            image[t + 0x1A + slot] = 0xA0 | (slot as u8 + 1);
        }
        image[t] = 0x5A;
    }

    // "POWERS"
    let t = team_offset(0);
    image[t + 3..t + 9].copy_from_slice(&[25, 24, 44, 14, 27, 28]);
    image[t + 0x0E] = 0x23;
    image[t + 0x0F] = 0x3C;

    // fielder 0: "GUS", left handed, .345, 12 HR, METEOR
    let p = player_offset(0);
    image[p..p + 5].copy_from_slice(&[0x10, 0x1E, 0x1C, 96, 96]);
    image[p + 0x05] = 0x81;
    image[p + 0x06] = 0x45;
    image[p + 0x07] = 3;
    image[p + 0x08] = 0x12;
    image[p + 0x0B] = 7;
    image[p + 0x0C] = 8;
    image[p + 0x0D] = 9;
    image[p + 0x0F] = 60;
    image[p + 0x10] = 0x07;
    image[p + 0x11] = 1;
    image[p + 0x17] = 0xC3;

    // pitcher 216 (team 0, slot 0): "ACE", ERA 2.50, speed 88
    let p = player_offset(216);
    image[p..p + 5].copy_from_slice(&[10, 12, 14, 96, 96]);
    image[p + 0x06] = 0x50;
    image[p + 0x07] = 2;
    image[p + 0x08] = 0x88;
    image[p + 0x0B] = 11;
    image[p + 0x0C] = 12;
    image[p + 0x0D] = 13;
    image[p + 0x0E] = 70;
    image[p + 0x10] = 0x01;
    image[p + 0x11] = 0x0A;

    // team 0 logo: top row of the first tile is opaque black
    image[LOGO_BASE] = 0xFF;

    fix_checksum(&mut image);
    image
}

fn open() -> Session {
    Engine::new()
        .open_bytes(fixture_image())
        .expect("fixture should open")
}

#[test]
fn decodes_team_roster() {
    let session = open();
    let team = session.team(0).unwrap();
    assert_eq!(team.name, "POWERS    ");
    assert_eq!(team.fielders().len(), 12);
    assert_eq!(team.pitchers().len(), 6);

    let first = &team.fielders()[0];
    assert_eq!(first.position, FieldPosition::Catcher);
    assert_eq!(first.number, 3);
    assert_eq!(first.player.index(), 0);
    assert_eq!(first.player.role(), Role::Fielder);
    assert_eq!(first.player.name, "GUS  ");
    assert_eq!(first.player.handedness, Handedness::Left);
    let batting = first.player.batting().unwrap();
    assert_eq!(batting.average, 345);
    assert_eq!(batting.home_runs, 12);
    assert_eq!(batting.ability, HitterAbility::Meteor);

    assert_eq!(team.fielders()[1].position, FieldPosition::FirstBase);
    assert_eq!(team.fielders()[1].number, 12);

    let ace = &team.pitchers()[0];
    assert_eq!(ace.number, 1);
    assert_eq!(ace.high_bits(), 0xA0);
    assert_eq!(ace.player.index(), 216);
    assert_eq!(ace.player.role(), Role::Pitcher);
    let pitching = ace.player.pitching().unwrap();
    assert_eq!(pitching.era, 250);
    assert_eq!(pitching.speed, 88);
    assert_eq!(pitching.stamina, 70);
    assert_eq!(pitching.abilities[0], PitcherAbility::FireBall);
    assert_eq!(pitching.abilities[1], PitcherAbility::ZigZagBall);

    let last = session.team(17).unwrap();
    assert_eq!(last.pitchers()[5].player.index(), 323);
    assert_eq!(last.fielders()[11].player.index(), 215);
}

#[test]
fn out_of_range_team_is_a_range_error() {
    let mut session = open();
    assert_eq!(session.team(18).unwrap_err().code, CoreErrorCode::Range);
    assert_eq!(session.commit_team(18).unwrap_err().code, CoreErrorCode::Range);
    assert_eq!(session.export_logo(18).unwrap_err().code, CoreErrorCode::Range);
}

#[test]
fn session_layout_matches_record_offsets() {
    let session = open();
    assert_eq!(session.rom().header_offset(), HEADER);
    assert!(!session.rom().has_copier_header());

    let layout = session.layout().unwrap();
    let team = layout.find(RegionId::Team(1)).unwrap();
    assert_eq!(team.start, team_offset(1));
    assert_eq!(team.len(), 0x20);
    let player = layout.find(RegionId::Player(216)).unwrap();
    assert_eq!(player.start, player_offset(216));
    assert_eq!(layout.find(RegionId::LogoHigh(0)).unwrap().start, LOGO_BASE);
    assert_eq!(layout.find(RegionId::LogoLow(0)).unwrap().start, LOGO_BASE + 0x200);
    assert!(layout.find(RegionId::Player(324)).is_none());
}

#[test]
fn unedited_image_roundtrips_byte_for_byte() {
    let image = fixture_image();
    let mut session = Engine::new().open_bytes(&image).unwrap();
    let saved = session.save().unwrap();
    assert_eq!(saved, image);
}

#[test]
fn edits_reach_the_image_only_after_commit() {
    let image = fixture_image();
    let mut session = Engine::new().open_bytes(&image).unwrap();

    {
        let team = session.team_mut(0).unwrap();
        team.name = "bombers".to_string();
        team.fielders_mut()[0].number = 9;
        let player = &mut team.fielders_mut()[0].player;
        player.handedness = Handedness::Right;
        if let PlayerStats::Fielder(stats) = &mut player.stats {
            stats.average = 401;
            stats.home_runs = 55;
        }
    }
    assert_eq!(session.to_bytes_unmodified(), image);

    session.commit_team(0).unwrap();
    let bytes = session.to_bytes_unmodified();
    let t = team_offset(0);
    assert_eq!(&bytes[t + 3..t + 13], &[11, 24, 22, 11, 14, 27, 28, 96, 96, 96]);
    assert_eq!(bytes[t + 0x0E], 0x29);
    assert_eq!(bytes[t], 0x5A);
    let p = player_offset(0);
    assert_eq!(bytes[p + 0x05], 0x80);
    assert_eq!(&bytes[p + 0x06..p + 0x09], &[0x01, 4, 0x55]);
    assert_eq!(bytes[p + 0x17], 0xC3);

    let saved = session.save().unwrap();
    let reloaded = Engine::new().open_bytes(&saved).expect("saved image reloads");
    let team = reloaded.team(0).unwrap();
    assert_eq!(team.name, "BOMBERS   ");
    assert_eq!(team.fielders()[0].number, 9);
    assert_eq!(team.fielders()[0].player.batting().unwrap().average, 401);
}

#[test]
fn failed_commit_writes_nothing() {
    let image = fixture_image();
    let mut session = Engine::new().open_bytes(&image).unwrap();
    {
        let team = session.team_mut(0).unwrap();
        team.name = "POWERS2".to_string();
        // last player in the encode order is invalid
        if let PlayerStats::Pitcher(stats) = &mut team.pitchers_mut()[5].player.stats {
            stats.speed = 100;
        }
    }
    let err = session.commit_team(0).unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Encoding);
    assert_eq!(session.to_bytes_unmodified(), image);
}

#[test]
fn ability_sets_active_flag() {
    let mut session = open();
    {
        let player = &mut session.team_mut(1).unwrap().fielders_mut()[0].player;
        if let PlayerStats::Fielder(stats) = &mut player.stats {
            stats.ability = HitterAbility::HyperHit;
        }
    }
    session.commit_team(1).unwrap();
    let bytes = session.to_bytes_unmodified();
    let p = player_offset(12);
    assert_eq!(bytes[p + 0x10], 0x01);
    assert_eq!(bytes[p + 0x11], 0x01);
}

#[test]
fn export_then_import_moves_a_team() {
    let mut session = open();
    let mut export = session.export_team(0).unwrap();
    assert_eq!(export.name, "POWERS    ");
    assert_eq!(export.fielders[0].player.pwr, HitterAbility::Meteor);
    assert_eq!(export.pitchers[0].player.pwr.len(), 4);

    export.name = "COPY".to_string();
    export.pitchers[0].number = 7;
    export.pitchers[0].player.pwr = vec![PitcherAbility::WarpBall];
    session.import_team(3, &export).unwrap();

    let saved = session.save().unwrap();
    let t = team_offset(3);
    assert_eq!(saved[t + 0x1A], 0xA7);

    let reloaded = Engine::new().open_bytes(&saved).unwrap();
    let moved = reloaded.export_team(3).unwrap();
    assert_eq!(moved.name, "COPY      ");
    assert_eq!(moved.fielders, export.fielders);
    assert_eq!(
        moved.pitchers[0].player.pwr,
        vec![
            PitcherAbility::WarpBall,
            PitcherAbility::Nothing,
            PitcherAbility::Nothing,
            PitcherAbility::Nothing
        ]
    );
    assert_eq!(moved.pitchers[1..], export.pitchers[1..]);
}

#[test]
fn bad_imports_leave_the_team_untouched() {
    let mut session = open();
    let good = session.export_team(0).unwrap();
    let before = session.team(0).unwrap().clone();

    let mut short = good.clone();
    short.fielders.pop();
    assert_eq!(
        session.import_team(0, &short).unwrap_err().code,
        CoreErrorCode::Schema
    );

    let mut too_many_pitches = good.clone();
    too_many_pitches.pitchers[2].player.pwr = vec![PitcherAbility::FireBall; 5];
    assert_eq!(
        session.import_team(0, &too_many_pitches).unwrap_err().code,
        CoreErrorCode::Schema
    );

    let mut big_number = good.clone();
    big_number.fielders[4].number = 16;
    assert_eq!(
        session.import_team(0, &big_number).unwrap_err().code,
        CoreErrorCode::Encoding
    );

    let mut bad_name = good.clone();
    bad_name.fielders[11].player.name = "A-B".to_string();
    assert_eq!(
        session.import_team(0, &bad_name).unwrap_err().code,
        CoreErrorCode::Encoding
    );

    let mut bad_average = good;
    bad_average.fielders[0].player.av = 1000;
    assert_eq!(
        session.import_team(0, &bad_average).unwrap_err().code,
        CoreErrorCode::Encoding
    );

    assert_eq!(session.team(0).unwrap(), &before);
}

#[test]
fn logo_exports_palette_colors_and_imports_quantized() {
    let mut session = open();
    let bitmap = session.export_logo(0).unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (24, 16));
    assert_eq!(bitmap.get(0, 0), [0, 0, 0, 0xFF]);
    assert_eq!(bitmap.get(7, 0), [0, 0, 0, 0xFF]);
    assert_eq!(bitmap.get(8, 0), [0, 0, 0, 0]);
    assert_eq!(bitmap.get(0, 8), [0, 0, 0, 0]);

    let mut white = Bitmap::new(24, 16);
    for y in 0..16 {
        for x in 0..24 {
            white.set(x, y, [0xFA, 0xFA, 0xFA, 0xFF]);
        }
    }
    white.set(23, 15, [0xFF, 0, 0, 0x7F]);
    session.import_logo(5, &white).unwrap();

    let saved = session.save().unwrap();
    let reloaded = Engine::new().open_bytes(&saved).unwrap();
    let logo = reloaded.export_logo(5).unwrap();
    assert_eq!(logo.get(0, 0), [0xF7, 0xF7, 0xF7, 0xFF]);
    assert_eq!(logo.get(12, 9), [0xF7, 0xF7, 0xF7, 0xFF]);
    assert_eq!(logo.get(23, 15), [0, 0, 0, 0]);
    assert_eq!(reloaded.export_logo(0).unwrap(), bitmap);

    let err = session.import_logo(5, &Bitmap::new(16, 16)).unwrap_err();
    assert_eq!(err.code, CoreErrorCode::Encoding);
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn logs_go_through_the_injected_dispatch() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();

    let engine = Engine::with_dispatch(tracing::Dispatch::new(subscriber));
    let mut session = engine.open_bytes(fixture_image()).unwrap();
    session.save().unwrap();

    let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(logs.contains("found LoROM header at 0x7fc0"), "{logs}");
    assert!(logs.contains("checksum updated"), "{logs}");
}
