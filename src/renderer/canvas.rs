//! Drawing surface abstraction and the per-frame render pass
//!
//! The render pass only reads `GameState`. Anything that can fill circles
//! and rectangles and stroke lines can be a [`Canvas`]; [`DrawList`] records
//! the calls so a frame can be inspected or tessellated later.

use glam::Vec2;

use super::shapes;
use super::vertex::{Color, Vertex, colors};
use crate::consts::GRID_SIZE;
use crate::settings::{Viewport, WorldVariant};
use crate::sim::GameState;

/// Health bar geometry, relative to the enemy's bounding box
const HEALTH_BAR_GAP: f32 = 10.0;
const HEALTH_BAR_HEIGHT: f32 = 5.0;

/// Grid line thickness
const GRID_LINE_WIDTH: f32 = 1.0;

/// A 2D drawing surface in screen coordinates (y down)
pub trait Canvas {
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color);
}

/// One recorded canvas call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Rect {
        min: Vec2,
        size: Vec2,
        color: Color,
    },
}

/// Canvas that records every call
#[derive(Debug, Clone)]
pub struct DrawList {
    size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            size: Vec2::new(viewport.width, viewport.height),
            commands: Vec::new(),
        }
    }

    /// Circles drawn in `color`, in draw order
    pub fn circles(&self, color: Color) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.commands.iter().filter_map(move |c| match *c {
            DrawCommand::Circle {
                center,
                radius,
                color: fill,
            } if fill == color => Some((center, radius)),
            _ => None,
        })
    }

    pub fn tessellate(&self) -> Vec<Vertex> {
        shapes::tessellate(&self.commands)
    }
}

impl Canvas for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    // A clear starts a new frame
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { color });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect { min, size, color });
    }
}

/// World-to-screen translation for this frame
///
/// The infinite world keeps the player centered; the arena is drawn as is.
pub fn camera_offset(state: &GameState, screen: Vec2) -> Vec2 {
    match state.variant() {
        WorldVariant::Infinite => screen / 2.0 - state.player.pos,
        WorldVariant::Arena => Vec2::ZERO,
    }
}

/// Draw one frame: background, grid, trees, jewels, enemies, bullets, player
pub fn draw_frame<C: Canvas + ?Sized>(state: &GameState, canvas: &mut C) {
    let screen = canvas.size();
    let offset = camera_offset(state, screen);

    canvas.clear(colors::BACKGROUND);
    draw_grid(canvas, offset, screen);

    for tree in &state.trees {
        canvas.fill_circle(tree.pos + offset, tree.radius, colors::TREE);
    }
    for jewel in &state.jewels {
        canvas.fill_circle(jewel.pos + offset, jewel.radius, colors::JEWEL);
    }
    for enemy in &state.enemies {
        let pos = enemy.pos + offset;
        canvas.fill_circle(pos, enemy.radius, colors::ENEMY);

        let r = enemy.radius;
        let bar_min = pos - Vec2::new(r, r + HEALTH_BAR_GAP);
        let width = 2.0 * r;
        canvas.fill_rect(
            bar_min,
            Vec2::new(width, HEALTH_BAR_HEIGHT),
            colors::HEALTH_BAR_BACK,
        );
        canvas.fill_rect(
            bar_min,
            Vec2::new(width * enemy.health_fraction(), HEALTH_BAR_HEIGHT),
            colors::HEALTH_BAR_FILL,
        );
    }
    for bullet in &state.bullets {
        canvas.fill_circle(bullet.pos + offset, bullet.radius, colors::BULLET);
    }

    let player = &state.player;
    canvas.fill_circle(player.pos + offset, player.radius, colors::PLAYER);
}

/// First on-screen grid line so lines stay anchored to world multiples of the cell size
fn grid_start(offset: f32) -> f32 {
    offset.rem_euclid(GRID_SIZE)
}

fn draw_grid<C: Canvas + ?Sized>(canvas: &mut C, offset: Vec2, screen: Vec2) {
    let mut x = grid_start(offset.x);
    while x <= screen.x {
        canvas.line(
            Vec2::new(x, 0.0),
            Vec2::new(x, screen.y),
            GRID_LINE_WIDTH,
            colors::GRID,
        );
        x += GRID_SIZE;
    }

    let mut y = grid_start(offset.y);
    while y <= screen.y {
        canvas.line(
            Vec2::new(0.0, y),
            Vec2::new(screen.x, y),
            GRID_LINE_WIDTH,
            colors::GRID,
        );
        y += GRID_SIZE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{Bullet, Enemy, Jewel, Tree, WeaponKind};

    fn frame(state: &GameState) -> DrawList {
        let mut list = DrawList::new(state.settings.viewport);
        draw_frame(state, &mut list);
        list
    }

    #[test]
    fn test_player_centered_in_infinite_world() {
        let mut state = GameState::new(Settings::default().with_seed(1), 0.0);
        state.player.pos = Vec2::new(1234.0, -56.0);
        let list = frame(&state);
        let players: Vec<_> = list.circles(colors::PLAYER).collect();
        assert_eq!(players, vec![(Vec2::new(400.0, 300.0), 15.0)]);
    }

    #[test]
    fn test_arena_draws_world_coordinates() {
        let mut state = GameState::new(Settings::arena().with_seed(1), 0.0);
        state.enemies.push(Enemy::new(1, Vec2::new(100.0, 120.0), 1.0));
        let list = frame(&state);
        let enemies: Vec<_> = list.circles(colors::ENEMY).collect();
        assert_eq!(enemies, vec![(Vec2::new(100.0, 120.0), 20.0)]);
    }

    #[test]
    fn test_draw_order() {
        let mut state = GameState::new(Settings::arena().with_seed(1), 0.0);
        state.trees.push(Tree::new(1, Vec2::new(10.0, 10.0)));
        state.jewels.push(Jewel::new(2, Vec2::new(20.0, 20.0)));
        state.enemies.push(Enemy::new(3, Vec2::new(30.0, 30.0), 1.0));
        let spec = WeaponKind::Basic.spec();
        state
            .bullets
            .push(Bullet::new(4, Vec2::new(40.0, 40.0), 0.0, &spec));

        let list = frame(&state);
        assert!(matches!(list.commands[0], DrawCommand::Clear { .. }));
        let circle_colors: Vec<Color> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(
            circle_colors,
            vec![
                colors::TREE,
                colors::JEWEL,
                colors::ENEMY,
                colors::BULLET,
                colors::PLAYER
            ]
        );
    }

    #[test]
    fn test_health_bar_scales_with_health() {
        let mut state = GameState::new(Settings::arena().with_seed(1), 0.0);
        let mut enemy = Enemy::new(1, Vec2::new(100.0, 100.0), 1.0);
        enemy.take_damage(enemy.max_health / 2);
        let expected = 40.0 * enemy.health_fraction();
        state.enemies.push(enemy);

        let list = frame(&state);
        let bars: Vec<_> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { min, size, color } => Some((*min, *size, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].0, Vec2::new(80.0, 70.0));
        assert_eq!(bars[0].1, Vec2::new(40.0, 5.0));
        assert_eq!(bars[1].2, colors::HEALTH_BAR_FILL);
        assert!((bars[1].1.x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_grid_follows_camera() {
        assert_eq!(grid_start(0.0), 0.0);
        assert_eq!(grid_start(-10.0), 40.0);
        assert_eq!(grid_start(120.0), 20.0);
    }

    #[test]
    fn test_clear_resets_recording() {
        let state = GameState::new(Settings::arena().with_seed(1), 0.0);
        let mut list = DrawList::new(state.settings.viewport);
        draw_frame(&state, &mut list);
        let first = list.commands.len();
        draw_frame(&state, &mut list);
        assert_eq!(list.commands.len(), first);
        assert!(!list.tessellate().is_empty());
    }
}
