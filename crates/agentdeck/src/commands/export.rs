use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use anyhow::Context as _;
use colored::Colorize;
use eframe::egui;
use tracing::{info, warn};

use crate::config::Config;
use crate::deck::Deck;
use crate::render::background::BackgroundSource;
use crate::render::image_cache::ImageCache;
use crate::render::{self, ActiveSlide, SlideCtx};
use crate::theme::Theme;

/// A save error, handed back to `run` once the window closes.
type Failure = Rc<RefCell<Option<anyhow::Error>>>;

struct ExportApp {
    deck: Deck,
    theme: Theme,
    image_cache: ImageCache,
    backgrounds: BackgroundSource,
    output_dir: PathBuf,
    current_slide: usize,
    active: Option<ActiveSlide>,
    screenshot_requested: bool,
    failure: Failure,
    done: bool,
}

impl ExportApp {
    fn new(
        deck: Deck,
        backgrounds: BackgroundSource,
        output_dir: PathBuf,
        failure: Failure,
    ) -> Self {
        let image_cache = ImageCache::new(deck.base_path().to_path_buf());
        Self {
            deck,
            theme: Theme::default(),
            image_cache,
            backgrounds,
            output_dir,
            current_slide: 0,
            active: None,
            screenshot_requested: false,
            failure,
            done: false,
        }
    }

    /// Create local state for the slide being exported, once per slide.
    fn activate_current(&mut self, now: Instant) {
        let Some(slide) = self.deck.get(self.current_slide) else {
            return;
        };
        if self.active.as_ref().is_some_and(|a| a.index == self.current_slide) {
            return;
        }
        if let Some(previous) = self.active.as_mut() {
            previous.deactivate(now);
        }
        self.active = Some(ActiveSlide::activate(
            self.current_slide,
            slide,
            &self.backgrounds,
            &self.theme,
            now,
        ));
    }

    fn finish(&mut self, ctx: &egui::Context) {
        self.done = true;
        self.active = None;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

impl eframe::App for ExportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.done {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // The screenshot requested last frame
        let mut shot = None;
        ctx.input(|i| {
            for event in &i.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    shot = Some(image.clone());
                }
            }
        });

        if let Some(image) = shot {
            let filename = slide_filename(self.current_slide);
            let path = self.output_dir.join(&filename);
            match save_color_image(&image, &path) {
                Ok(()) => info!("Saved {filename}"),
                Err(err) => {
                    *self.failure.borrow_mut() = Some(err);
                    self.finish(ctx);
                    return;
                }
            }
            self.screenshot_requested = false;
            self.current_slide += 1;
            if self.current_slide >= self.deck.len() {
                self.finish(ctx);
                return;
            }
        }

        let now = Instant::now();
        self.activate_current(now);
        let Self {
            deck,
            theme,
            image_cache,
            active,
            current_slide,
            ..
        } = &mut *self;
        let (Some(slide), Some(active)) = (deck.get(*current_slide), active.as_mut()) else {
            self.finish(ctx);
            return;
        };
        let bg = theme.background;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);

                // Every entrance finished and the demo run to its end.
                let cx = SlideCtx {
                    ui,
                    theme,
                    rect,
                    opacity: 1.0,
                    scale: render::compute_scale(rect),
                    elapsed: render::SETTLE.as_secs_f32(),
                    now: active.activated() + render::SETTLE,
                    interactive: false,
                };
                render::render_slide(&cx, slide, &mut active.state, image_cache);
            });

        if !self.screenshot_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            self.screenshot_requested = true;
        }

        ctx.request_repaint();
    }
}

/// "slide-01.png" for the first slide.
fn slide_filename(index: usize) -> String {
    format!("slide-{:02}.png", index + 1)
}

fn save_color_image(image: &egui::ColorImage, path: &Path) -> anyhow::Result<()> {
    let width = image.width() as u32;
    let height = image.height() as u32;
    let pixels: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| [c.r(), c.g(), c.b(), c.a()])
        .collect();

    image::save_buffer(path, &pixels, width, height, image::ColorType::Rgba8)
        .with_context(|| format!("Failed to save {}", path.display()))
}

pub fn run(
    deck_path: Option<PathBuf>,
    output_dir: PathBuf,
    width: u32,
    height: u32,
) -> anyhow::Result<()> {
    let deck = Deck::open(deck_path.as_deref())?;
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    eprintln!(
        "Exporting {} slides to {} ({}x{})",
        deck.len(),
        output_dir.display(),
        width,
        height,
    );

    let config = Config::load_or_default();
    let title = "agentdeck export".to_string();
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([width as f32, height as f32])
        .with_title(&title)
        .with_decorations(false);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let failure = Failure::default();
    let failure_slot = failure.clone();
    let output = output_dir.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            if cc.gl.is_none() {
                warn!("No GL context; the cover is exported with the static background");
            }
            let backgrounds = BackgroundSource {
                kind: config.background(),
                gl: cc.gl.clone(),
                reduced_motion: true,
            };
            Ok(Box::new(ExportApp::new(
                deck,
                backgrounds,
                output,
                failure_slot,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    if let Some(err) = failure.borrow_mut().take() {
        return Err(err);
    }
    eprintln!("{}", "Export complete.".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_filenames_are_numbered_from_one() {
        assert_eq!(slide_filename(0), "slide-01.png");
        assert_eq!(slide_filename(9), "slide-10.png");
        assert_eq!(slide_filename(99), "slide-100.png");
    }

    #[test]
    fn test_save_color_image_writes_png() {
        let dir = std::env::temp_dir().join(format!("agentdeck-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(slide_filename(0));
        let image = egui::ColorImage::from_rgba_unmultiplied([3, 2], &[255, 0, 0, 255].repeat(6));

        save_color_image(&image, &path).unwrap();
        let decoded = image::open(&path).unwrap().into_rgba8();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let image = egui::ColorImage::from_rgba_unmultiplied([1, 1], &[0, 0, 0, 255]);
        let err = save_color_image(&image, Path::new("/definitely/not/here/slide-01.png"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to save"));
    }
}
