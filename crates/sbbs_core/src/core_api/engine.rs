use tracing::Dispatch;

use crate::layout::RomLayout;
use crate::rom::Rom;
use crate::rom::header::RomHeader;
use crate::sbbs;
use crate::sbbs::ability::PitcherAbility;
use crate::sbbs::logo::{Bitmap, TeamLogo};
use crate::sbbs::player::{BattingStats, PitchingStats, PlayerRecord, PlayerStats};
use crate::sbbs::team::Team;
use crate::sbbs::types::{
    FIELDERS_PER_TEAM, MAX_TEAM_IDX, PITCHER_ABILITY_SLOTS, PITCHERS_PER_TEAM, TEAM_COUNT,
};

use super::error::{CoreError, CoreErrorCode};
use super::types::{
    FielderAssignmentExport, FielderExport, PitcherAssignmentExport, PitcherExport, TeamExport,
};

#[derive(Debug, Default, Clone)]
pub struct Engine {
    dispatch: Option<Dispatch>,
}

/// A loaded image plus the decoded teams and logos. Edits land in the decoded
/// values and only reach the image on commit.
#[derive(Debug)]
pub struct Session {
    rom: Rom,
    teams: Vec<Team>,
    logos: Vec<TeamLogo>,
    dispatch: Option<Dispatch>,
}

fn scoped<T>(dispatch: Option<&Dispatch>, f: impl FnOnce() -> T) -> T {
    match dispatch {
        Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
        None => f(),
    }
}

fn team_index_error(idx: usize) -> CoreError {
    CoreError::new(
        CoreErrorCode::Range,
        format!("team index {idx} is bigger than max team index {MAX_TEAM_IDX}"),
    )
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route everything the core logs through `dispatch` instead of the
    /// global default.
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let bytes = bytes.as_ref();
        scoped(self.dispatch.as_ref(), || -> Result<Session, CoreError> {
            let rom = sbbs::load_rom(bytes)?;
            let teams = (0..TEAM_COUNT)
                .map(|idx| Team::decode(&rom, idx))
                .collect::<Result<Vec<_>, _>>()?;
            let logos = (0..TEAM_COUNT)
                .map(|idx| TeamLogo::decode(&rom, idx))
                .collect::<Result<Vec<_>, _>>()?;
            tracing::info!("loaded {} teams", teams.len());
            Ok(Session {
                rom,
                teams,
                logos,
                dispatch: self.dispatch.clone(),
            })
        })
    }
}

impl Session {
    pub fn header(&self) -> &RomHeader {
        self.rom.header()
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn layout(&self) -> Result<RomLayout, CoreError> {
        sbbs::layout(&self.rom)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, idx: usize) -> Result<&Team, CoreError> {
        self.teams.get(idx).ok_or_else(|| team_index_error(idx))
    }

    pub fn team_mut(&mut self, idx: usize) -> Result<&mut Team, CoreError> {
        self.teams.get_mut(idx).ok_or_else(|| team_index_error(idx))
    }

    pub fn logo(&self, idx: usize) -> Result<&TeamLogo, CoreError> {
        self.logos.get(idx).ok_or_else(|| team_index_error(idx))
    }

    pub fn commit_team(&mut self, idx: usize) -> Result<(), CoreError> {
        let dispatch = self.dispatch.clone();
        scoped(dispatch.as_ref(), || -> Result<(), CoreError> {
            let team = self.teams.get(idx).ok_or_else(|| team_index_error(idx))?;
            team.commit(&mut self.rom)
        })
    }

    /// Write every team and logo back into the image.
    pub fn commit_all(&mut self) -> Result<(), CoreError> {
        let dispatch = self.dispatch.clone();
        scoped(dispatch.as_ref(), || -> Result<(), CoreError> {
            for team in &self.teams {
                team.commit(&mut self.rom)?;
            }
            for logo in &self.logos {
                logo.commit(&mut self.rom)?;
            }
            tracing::debug!("committed {} teams and logos", self.teams.len());
            Ok(())
        })
    }

    /// Commit everything, fix the checksum and return the full image.
    pub fn save(&mut self) -> Result<Vec<u8>, CoreError> {
        self.commit_all()?;
        let dispatch = self.dispatch.clone();
        Ok(scoped(dispatch.as_ref(), || self.rom.save()))
    }

    /// The image as it currently stands, with no commit and no checksum update.
    pub fn to_bytes_unmodified(&self) -> Vec<u8> {
        self.rom.as_bytes().to_vec()
    }

    pub fn export_team(&self, idx: usize) -> Result<TeamExport, CoreError> {
        let team = self.team(idx)?;
        let fielders = team
            .fielders()
            .iter()
            .map(|f| -> Result<_, CoreError> {
                let player = fielder_export(&f.player)?;
                Ok(FielderAssignmentExport {
                    field_position: f.position,
                    number: f.number,
                    player,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let pitchers = team
            .pitchers()
            .iter()
            .map(|p| -> Result<_, CoreError> {
                let player = pitcher_export(&p.player)?;
                Ok(PitcherAssignmentExport {
                    number: p.number,
                    player,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TeamExport {
            name: team.name.clone(),
            fielders,
            pitchers,
        })
    }

    /// Replace a team's decoded values with `export`. The whole record is
    /// validated (including that it would encode) before anything changes.
    pub fn import_team(&mut self, idx: usize, export: &TeamExport) -> Result<(), CoreError> {
        let dispatch = self.dispatch.clone();
        scoped(dispatch.as_ref(), || -> Result<(), CoreError> {
            let mut team = self.team(idx)?.clone();
            apply_team_export(&mut team, export)
                .map_err(|e| e.context(format!("import of team {idx}")))?;
            team.encode(&self.rom)
                .map_err(|e| e.context(format!("import of team {idx}")))?;
            tracing::info!("imported team {} \"{}\"", idx, team.name.trim_end());
            self.teams[idx] = team;
            Ok(())
        })
    }

    pub fn export_logo(&self, idx: usize) -> Result<Bitmap, CoreError> {
        Ok(self.logo(idx)?.to_bitmap())
    }

    pub fn import_logo(&mut self, idx: usize, bitmap: &Bitmap) -> Result<(), CoreError> {
        let dispatch = self.dispatch.clone();
        scoped(dispatch.as_ref(), || -> Result<(), CoreError> {
            let mut logo = self.logo(idx)?.clone();
            logo.apply_bitmap(bitmap)
                .map_err(|e| e.context(format!("import of logo {idx}")))?;
            tracing::info!("imported logo {}", idx);
            self.logos[idx] = logo;
            Ok(())
        })
    }
}

fn role_mismatch(player: &PlayerRecord, expected: &str) -> CoreError {
    CoreError::new(
        CoreErrorCode::Schema,
        format!("player {} is not a {expected}", player.index()),
    )
}

fn fielder_export(player: &PlayerRecord) -> Result<FielderExport, CoreError> {
    let stats = player
        .batting()
        .ok_or_else(|| role_mismatch(player, "fielder"))?;
    Ok(FielderExport {
        name: player.name.clone(),
        handedness: player.handedness,
        st: stats.stamina,
        av: stats.average,
        hr: stats.home_runs,
        r: stats.running,
        f: stats.fielding,
        yeet: stats.throwing,
        pwr: stats.ability,
    })
}

fn pitcher_export(player: &PlayerRecord) -> Result<PitcherExport, CoreError> {
    let stats = player
        .pitching()
        .ok_or_else(|| role_mismatch(player, "pitcher"))?;
    Ok(PitcherExport {
        name: player.name.clone(),
        era: stats.era,
        spd: stats.speed,
        r: stats.pitch_right,
        l: stats.pitch_left,
        f: stats.fielding,
        st: stats.stamina,
        pwr: stats.abilities.to_vec(),
    })
}

fn check_section_len(section: &str, found: usize, expected: usize) -> Result<(), CoreError> {
    if found != expected {
        return Err(CoreError::new(
            CoreErrorCode::Schema,
            format!("{section}: expected {expected} entries, found {found}"),
        ));
    }
    Ok(())
}

fn pitch_slots(pwr: &[PitcherAbility]) -> Result<[PitcherAbility; PITCHER_ABILITY_SLOTS], CoreError> {
    if pwr.len() > PITCHER_ABILITY_SLOTS {
        return Err(CoreError::new(
            CoreErrorCode::Schema,
            format!(
                "pwr: at most {PITCHER_ABILITY_SLOTS} pitches, found {}",
                pwr.len()
            ),
        ));
    }
    let mut slots = [PitcherAbility::Nothing; PITCHER_ABILITY_SLOTS];
    slots[..pwr.len()].copy_from_slice(pwr);
    Ok(slots)
}

fn apply_team_export(team: &mut Team, export: &TeamExport) -> Result<(), CoreError> {
    check_section_len("fielders", export.fielders.len(), FIELDERS_PER_TEAM)?;
    check_section_len("pitchers", export.pitchers.len(), PITCHERS_PER_TEAM)?;

    team.name = export.name.clone();

    for (slot, (assignment, src)) in team
        .fielders_mut()
        .iter_mut()
        .zip(&export.fielders)
        .enumerate()
    {
        assignment.position = src.field_position;
        assignment.number = src.number;
        let player = &mut assignment.player;
        if player.batting().is_none() {
            return Err(role_mismatch(player, "fielder").context(format!("fielder slot {slot}")));
        }
        player.name = src.player.name.clone();
        player.handedness = src.player.handedness;
        player.stats = PlayerStats::Fielder(BattingStats {
            average: src.player.av,
            home_runs: src.player.hr,
            throwing: src.player.yeet,
            running: src.player.r,
            fielding: src.player.f,
            stamina: src.player.st,
            ability: src.player.pwr,
        });
    }

    for (slot, (assignment, src)) in team
        .pitchers_mut()
        .iter_mut()
        .zip(&export.pitchers)
        .enumerate()
    {
        assignment.number = src.number;
        let player = &mut assignment.player;
        if player.pitching().is_none() {
            return Err(role_mismatch(player, "pitcher").context(format!("pitcher slot {slot}")));
        }
        let abilities =
            pitch_slots(&src.player.pwr).map_err(|e| e.context(format!("pitcher slot {slot}")))?;
        player.name = src.player.name.clone();
        // Handedness isn't part of the pitcher record and stays as decoded.
        player.stats = PlayerStats::Pitcher(PitchingStats {
            era: src.player.era,
            speed: src.player.spd,
            pitch_right: src.player.r,
            pitch_left: src.player.l,
            fielding: src.player.f,
            stamina: src.player.st,
            abilities,
        });
    }

    Ok(())
}
