/// Rendering layer: all terminal I/O lives here.
///
/// `render` takes a `Snapshot` in world units (a 1540 x 870 playfield) and
/// scales it onto whatever terminal size is available.  No game logic runs
/// here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use final_flight::compute::{BoostBand, EntityView, GameEvent, Hud, Snapshot, ViewKind};
use final_flight::entities::{EnemyKind, ProjectileKind};
use final_flight::player::FiringMode;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_KILLS: Color = Color::Yellow;
const C_HUD_MODE: Color = Color::White;
const C_PLAYER: Color = Color::White;
const C_ENEMY_BASIC: Color = Color::Green;
const C_ENEMY_ADVANCED: Color = Color::Red;
const C_BOSS: Color = Color::Magenta;
const C_SHIELD: Color = Color::Cyan;
const C_SHOT_PLAYER: Color = Color::Cyan;
const C_SHOT_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Terminal cell grid the world is projected onto.
struct Viewport {
    width: u16,
    height: u16,
    scale_x: f64,
    scale_y: f64,
}

impl Viewport {
    fn new(width: u16, height: u16, world_w: f64, world_h: f64) -> Self {
        // one column of wall each side, HUD + top wall, bottom wall + hint
        let inner_w = f64::from(width.saturating_sub(2).max(1));
        let inner_h = f64::from(height.saturating_sub(4).max(1));
        Self {
            width,
            height,
            scale_x: inner_w / world_w,
            scale_y: inner_h / world_h,
        }
    }

    /// World point to terminal cell, `None` when off the playfield.
    fn cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let col = (x * self.scale_x).floor() + 1.0;
        let row = (y * self.scale_y).floor() + 2.0;
        let max_col = f64::from(self.width.saturating_sub(2));
        let max_row = f64::from(self.height.saturating_sub(3));
        if col < 1.0 || row < 2.0 || col > max_col || row > max_row {
            return None;
        }
        Some((col as u16, row as u16))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    world: (f64, f64),
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(width, height, world.0, world.1);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, &view)?;
    draw_hud(out, &view, &snapshot.hud, snapshot.level.as_str())?;

    for entity in &snapshot.entities {
        draw_entity(out, &view, entity)?;
    }

    draw_controls_hint(out, &view)?;

    match &snapshot.outcome {
        Some(GameEvent::Won) => draw_banner(out, &view, "YOU WIN", "R : Restart   Q : Quit", Color::Green)?,
        Some(GameEvent::Lost) => draw_banner(out, &view, "GAME OVER", "R : Restart   Q : Quit", Color::Red)?,
        _ if snapshot.paused => draw_banner(out, &view, "PAUSED", "P : Resume   R : Restart   Q : Quit", Color::White)?,
        _ => {}
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn mode_label(mode: FiringMode) -> &'static str {
    match mode {
        FiringMode::Single => "SINGLE",
        FiringMode::Spread => "SPREAD",
        FiringMode::Heavy => "HEAVY",
    }
}

fn bar(fraction: f64, cells: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0)) * cells as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(cells - filled))
}

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, hud: &Hud, level: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!(
        "{}{} ",
        "♥".repeat(hud.health as usize),
        "·".repeat(hud.max_health.saturating_sub(hud.health) as usize)
    )))?;

    out.queue(style::SetForegroundColor(C_HUD_MODE))?;
    out.queue(Print(format!("Mode:{:<6} ", mode_label(hud.firing_mode))))?;

    let boost_color = match hud.boost_band() {
        BoostBand::High => Color::Green,
        BoostBand::Medium => Color::DarkYellow,
        BoostBand::Low => Color::Red,
    };
    out.queue(style::SetForegroundColor(boost_color))?;
    out.queue(Print(format!("Boost:{} ", bar(hud.boost_fraction, 10))))?;

    match hud.boss {
        Some(boss) => {
            out.queue(style::SetForegroundColor(if boss.shielded { C_SHIELD } else { C_BOSS }))?;
            out.queue(Print(format!("Boss:{}", bar(boss.health_fraction, 20))))?;
        }
        None => {
            out.queue(style::SetForegroundColor(C_HUD_KILLS))?;
            out.queue(Print(format!("Kills:{} / {}", hud.kills, hud.kill_target)))?;
        }
    }

    let tag = format!("[ {} ]", level.to_uppercase());
    let rx = view.width.saturating_sub(tag.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(tag))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_entity<W: Write>(out: &mut W, view: &Viewport, entity: &EntityView) -> std::io::Result<()> {
    let b = &entity.bounds;
    let Some((col, row)) = view.cell(b.x, b.center_y()) else {
        return Ok(());
    };
    let (glyph, color) = match entity.kind {
        ViewKind::Player => ("=>", C_PLAYER),
        ViewKind::Enemy(EnemyKind::Basic) => ("<=", C_ENEMY_BASIC),
        ViewKind::Enemy(EnemyKind::Advanced) => ("<≡", C_ENEMY_ADVANCED),
        ViewKind::Boss if entity.shielded => ("(<B>)", C_SHIELD),
        ViewKind::Boss => ("<B>", C_BOSS),
        ViewKind::Projectile(ProjectileKind::Single) => ("-", C_SHOT_PLAYER),
        ViewKind::Projectile(ProjectileKind::Spread) => ("·", C_SHOT_PLAYER),
        ViewKind::Projectile(ProjectileKind::Heavy) => ("●", C_SHOT_PLAYER),
        ViewKind::Projectile(ProjectileKind::Enemy) => ("~", C_SHOT_ENEMY),
        ViewKind::Projectile(ProjectileKind::Boss) => ("◄", C_SHOT_ENEMY),
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let hint = "WASD/Arrows: Move  Space: Fire  1/2/3: Mode  Shift/B: Boost  P: Pause  Q: Quit";
    let x = (view.width / 2).saturating_sub(hint.len() as u16 / 2);
    out.queue(cursor::MoveTo(x, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

fn draw_banner<W: Write>(
    out: &mut W,
    view: &Viewport,
    title: &str,
    options: &str,
    color: Color,
) -> std::io::Result<()> {
    let cx = view.width / 2;
    let cy = view.height / 2;
    out.queue(cursor::MoveTo(cx.saturating_sub(title.chars().count() as u16 / 2), cy.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(title))?;
    out.queue(cursor::MoveTo(cx.saturating_sub(options.chars().count() as u16 / 2), cy + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(options))?;
    Ok(())
}
