//! Canvas 2D surface (browser only)

use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{GOAL_POLE_HEIGHT, Screen, Sprite, Surface};
use crate::Viewport;
use crate::sim::{CollectibleKind, Gender, Rect};

/// Draws sprites with plain canvas primitives
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    /// Size of the frame being drawn
    viewport: Viewport,
}

impl CanvasSurface {
    /// Grab the 2D context of a canvas
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, wasm_bindgen::JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| wasm_bindgen::JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            ctx,
            viewport: Viewport::default(),
        })
    }

    fn fill(&self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn circle(&self, x: f64, y: f64, r: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.arc(x, y, r.max(0.0), 0.0, 2.0 * PI).ok();
        self.ctx.fill();
    }

    fn text(&self, text: &str, x: f64, y: f64, font: &str) {
        self.ctx.set_font(font);
        self.ctx.fill_text(text, x, y).ok();
    }

    fn draw_enemy(&self, rect: Rect, gender: Gender, name: &str, facing_right: bool) {
        let cx = (rect.x + rect.w / 2.0) as f64;
        let bottom = rect.bottom() as f64;
        // Three stacked snowballs
        self.circle(cx, bottom - 12.0, 13.0, "#ffffff");
        self.circle(cx, bottom - 30.0, 10.0, "#ffffff");
        self.circle(cx, bottom - 44.0, 7.0, "#ffffff");

        let eye = if facing_right { 2.0 } else { -2.0 };
        self.circle(cx - 3.0 + eye, bottom - 46.0, 1.5, "#000000");
        self.circle(cx + 3.0 + eye, bottom - 46.0, 1.5, "#000000");

        let hat = match gender {
            Gender::Male => "#333333",
            Gender::Female => "#d94c8c",
        };
        self.fill(Rect::new(rect.x + 8.0, rect.y - 6.0, 14.0, 6.0), hat);

        self.ctx.set_fill_style_str("#1a3355");
        self.ctx.set_text_align("center");
        self.text(name, cx, rect.y as f64 - 10.0, "12px sans-serif");
    }

    fn draw_player(
        &self,
        rect: Rect,
        facing_right: bool,
        walk_frame: u32,
        squash: glam::Vec2,
        rotation: f32,
        scale: f32,
    ) {
        let cx = (rect.x + rect.w / 2.0) as f64;
        let bottom = rect.bottom() as f64;

        self.ctx.save();
        self.ctx.translate(cx, bottom).ok();
        self.ctx.rotate(rotation as f64).ok();
        self.ctx
            .scale((squash.x * scale) as f64, (squash.y * scale) as f64)
            .ok();
        if !facing_right {
            self.ctx.scale(-1.0, 1.0).ok();
        }

        let w = rect.w as f64;
        let h = rect.h as f64;
        let stride = match walk_frame {
            1 => 3.0,
            3 => -3.0,
            _ => 0.0,
        };
        // Legs, coat, head, hat
        self.ctx.set_fill_style_str("#2b2b40");
        self.ctx.fill_rect(-w / 4.0 + stride, -10.0, 5.0, 10.0);
        self.ctx.fill_rect(w / 4.0 - 5.0 - stride, -10.0, 5.0, 10.0);
        self.ctx.set_fill_style_str("#c0392b");
        self.ctx.fill_rect(-w / 2.0, -h + 14.0, w, h - 24.0);
        self.circle(0.0, -h + 8.0, 8.0, "#f5d0b0");
        self.ctx.set_fill_style_str("#27ae60");
        self.ctx.fill_rect(-9.0, -h - 2.0, 18.0, 5.0);
        self.circle(4.0, -h + 7.0, 1.5, "#000000");

        self.ctx.restore();
    }

    fn draw_screen(&self, screen: &Screen, viewport: Viewport) {
        let w = viewport.width as f64;
        let h = viewport.height as f64;
        self.ctx.set_fill_style_str("rgba(10,20,40,0.6)");
        self.ctx.fill_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str("#ffffff");
        self.ctx.set_text_align("center");

        let (title, line) = match screen {
            Screen::NameEntry { typed } => ("Enter your name".to_string(), format!("{typed}_")),
            Screen::Start { name } => (format!("Ready, {name}?"), "Press Enter or Space".to_string()),
            Screen::GameOver { score } => ("Game Over".to_string(), format!("Score: {score}")),
            Screen::Victory { score } => ("You made it home!".to_string(), format!("Score: {score}")),
        };
        self.text(&title, w / 2.0, h / 2.0 - 20.0, "bold 40px sans-serif");
        self.text(&line, w / 2.0, h / 2.0 + 30.0, "24px sans-serif");
    }
}

impl Surface for CanvasSurface {
    fn begin(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let gradient = self
            .ctx
            .create_linear_gradient(0.0, 0.0, 0.0, viewport.height as f64);
        gradient.add_color_stop(0.0, "#1e3c72").ok();
        gradient.add_color_stop(1.0, "#a8c8ec").ok();
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx
            .fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
        self.ctx.set_global_alpha(1.0);
    }

    fn draw(&mut self, sprite: &Sprite) {
        match sprite {
            Sprite::Platform { rect, ground } => {
                let color = if *ground { "#e8f0f8" } else { "#8fb3d9" };
                self.fill(*rect, color);
                // Snow on top
                self.fill(Rect::new(rect.x, rect.y, rect.w, 4.0), "#ffffff");
            }
            Sprite::Goal { x, ground_y } => {
                self.fill(Rect::new(*x, ground_y - GOAL_POLE_HEIGHT, 4.0, GOAL_POLE_HEIGHT), "#5d4037");
                self.fill(Rect::new(x + 4.0, ground_y - GOAL_POLE_HEIGHT, 30.0, 20.0), "#e53935");
            }
            Sprite::House {
                body,
                chimney,
                door,
                lights_on,
            } => {
                self.fill(*chimney, "#7b3f2a");
                self.fill(*body, "#a0522d");
                // Roof
                self.ctx.set_fill_style_str("#ffffff");
                self.ctx.begin_path();
                self.ctx.move_to(body.x as f64 - 5.0, body.y as f64);
                self.ctx.line_to((body.x + body.w / 2.0) as f64, body.y as f64 - 25.0);
                self.ctx.line_to(body.right() as f64 + 5.0, body.y as f64);
                self.ctx.fill();
                let window = if *lights_on { "#ffd54f" } else { "#37474f" };
                self.fill(Rect::new(body.x + 8.0, body.y + 12.0, 14.0, 14.0), window);
                self.fill(Rect::new(body.right() - 22.0, body.y + 12.0, 14.0, 14.0), window);
                self.fill(*door, "#4e342e");
            }
            Sprite::Smoke {
                center,
                radius,
                opacity,
            } => {
                self.ctx.set_global_alpha(*opacity as f64);
                self.circle(center.x as f64, center.y as f64, *radius as f64, "#cfd8dc");
                self.ctx.set_global_alpha(1.0);
            }
            Sprite::Collectible {
                center,
                kind,
                scale,
                opacity,
            } => {
                self.ctx.set_global_alpha(*opacity as f64);
                let half = 12.0 * scale;
                let r = Rect::new(center.x - half, center.y - half, half * 2.0, half * 2.0);
                match kind {
                    CollectibleKind::Present => {
                        self.fill(r, "#e53935");
                        self.fill(Rect::new(center.x - 2.0 * scale, r.y, 4.0 * scale, r.h), "#ffeb3b");
                        self.fill(Rect::new(r.x, center.y - 2.0 * scale, r.w, 4.0 * scale), "#ffeb3b");
                    }
                    CollectibleKind::Star => {
                        self.circle(center.x as f64, center.y as f64, half as f64, "#ffd700");
                    }
                }
                self.ctx.set_global_alpha(1.0);
            }
            Sprite::Enemy {
                rect,
                gender,
                name,
                facing_right,
                opacity,
            } => {
                self.ctx.set_global_alpha(*opacity as f64);
                self.draw_enemy(*rect, *gender, name, *facing_right);
                self.ctx.set_global_alpha(1.0);
            }
            Sprite::Player {
                rect,
                facing_right,
                walk_frame,
                squash,
                rotation,
                scale,
                opacity,
            } => {
                self.ctx.set_global_alpha(*opacity as f64);
                self.draw_player(*rect, *facing_right, *walk_frame, *squash, *rotation, *scale);
                self.ctx.set_global_alpha(1.0);
            }
            Sprite::Hud { score, lives, best } => {
                self.ctx.set_fill_style_str("#ffffff");
                self.ctx.set_text_align("left");
                self.text(&format!("Score: {score}"), 20.0, 30.0, "20px sans-serif");
                self.text(&format!("Lives: {lives}"), 20.0, 55.0, "20px sans-serif");
                if let Some(best) = best {
                    self.text(&format!("Best: {best}"), 20.0, 80.0, "20px sans-serif");
                }
            }
            Sprite::Overlay(screen) => self.draw_screen(screen, self.viewport),
        }
    }
}
