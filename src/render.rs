use ggez::mint::Point2;
use ggez::{graphics, Context, GameResult};

use crate::config::Config;
use crate::state::{GameState, Position};

const BACKGROUND_COLOR: graphics::Color = graphics::Color::new(0.0, 0.0, 0.0, 1.0);
const FOOD_COLOR: graphics::Color = graphics::Color::new(0.78, 0.0, 0.0, 1.0);
const HEAD_COLOR: graphics::Color = graphics::Color::new(0.0, 0.47, 1.0, 1.0);
const BODY_COLOR: graphics::Color = graphics::Color::new(0.0, 0.7, 0.0, 1.0);
const LEGEND_COLOR: graphics::Color = graphics::Color::new(0.78, 0.78, 0.78, 1.0);
const SHADE_COLOR: graphics::Color = graphics::Color::new(0.0, 0.0, 0.0, 0.6);

/// Draws one frame. Reads the game, never changes it.
pub fn draw(ctx: &mut Context, state: &GameState, high_score: u32, config: &Config) -> GameResult {
    let mut canvas = graphics::Canvas::from_frame(ctx, BACKGROUND_COLOR);

    draw_cell(ctx, &mut canvas, state.food, FOOD_COLOR, config)?;
    for (i, pos) in state.snake.iter().enumerate() {
        let color = if i == 0 { HEAD_COLOR } else { BODY_COLOR };
        draw_cell(ctx, &mut canvas, *pos, color, config)?;
    }

    let hud = graphics::Text::new(format!(
        "Score: {}    High Score: {}    Speed: {}",
        state.score,
        high_score,
        config.tick_rate(state.speed, state.score),
    ));
    canvas.draw(
        &hud,
        graphics::DrawParam::default()
            .dest(Point2 { x: 10.0, y: 10.0 })
            .color(graphics::Color::WHITE),
    );
    let legend = graphics::Text::new("P:Pause  S:Save  L:Load  R:Restart  Q:Quit");
    canvas.draw(
        &legend,
        graphics::DrawParam::default()
            .dest(Point2 { x: 10.0, y: 32.0 })
            .color(LEGEND_COLOR),
    );

    if state.game_over {
        shade(ctx, &mut canvas, config)?;
        let mid = config.height as f32 / 2.0;
        draw_centered(ctx, &mut canvas, "GAME OVER", 48.0, mid - 60.0, FOOD_COLOR, config)?;
        draw_centered(
            ctx,
            &mut canvas,
            "R: Restart   Q: Quit   S: Save   L: Load",
            24.0,
            mid + 10.0,
            graphics::Color::WHITE,
            config,
        )?;
        draw_centered(
            ctx,
            &mut canvas,
            &format!("Final score: {}    High score: {}", state.score, high_score),
            24.0,
            mid + 50.0,
            graphics::Color::WHITE,
            config,
        )?;
    } else if state.paused {
        shade(ctx, &mut canvas, config)?;
        let mid = config.height as f32 / 2.0;
        draw_centered(
            ctx,
            &mut canvas,
            "PAUSED - press P to resume",
            40.0,
            mid - 30.0,
            graphics::Color::WHITE,
            config,
        )?;
    }

    canvas.finish(ctx)?;
    Ok(())
}

fn draw_cell(
    ctx: &mut Context,
    canvas: &mut graphics::Canvas,
    pos: Position,
    color: graphics::Color,
    config: &Config,
) -> GameResult {
    let rect = graphics::Rect::new(
        pos.x as f32,
        pos.y as f32,
        config.block as f32,
        config.block as f32,
    );
    canvas.draw(
        &graphics::Mesh::new_rectangle(ctx, graphics::DrawMode::fill(), rect, color)?,
        graphics::DrawParam::default(),
    );
    Ok(())
}

fn shade(ctx: &mut Context, canvas: &mut graphics::Canvas, config: &Config) -> GameResult {
    let rect = graphics::Rect::new(0.0, 0.0, config.width as f32, config.height as f32);
    canvas.draw(
        &graphics::Mesh::new_rectangle(ctx, graphics::DrawMode::fill(), rect, SHADE_COLOR)?,
        graphics::DrawParam::default(),
    );
    Ok(())
}

fn draw_centered(
    ctx: &mut Context,
    canvas: &mut graphics::Canvas,
    line: &str,
    scale: f32,
    y: f32,
    color: graphics::Color,
    config: &Config,
) -> GameResult {
    let mut text = graphics::Text::new(line);
    text.set_scale(scale);
    let size = text.measure(ctx)?;
    canvas.draw(
        &text,
        graphics::DrawParam::default()
            .dest(Point2 {
                x: (config.width as f32 - size.x) / 2.0,
                y,
            })
            .color(color),
    );
    Ok(())
}
