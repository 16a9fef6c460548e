//! Canvas showcase: every batcher, nested clipping, the modelview stack and
//! four-corner gradients in one animated window.

use std::f32::consts::TAU;

use anyhow::Result;
use glam::{Mat4, vec3};
use winit::dpi::LogicalSize;
use winit::window::WindowId;

use tessera_engine::canvas::Canvas;
use tessera_engine::coords::{Rect, Vec2};
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::device::{GpuInit, TextureId};
use tessera_engine::logging::{LoggingConfig, init_logging};
use tessera_engine::paint::{Color, Gradient};
use tessera_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "tessera studio".to_string(),
        initial_size: LogicalSize::new(960.0, 640.0),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), Showcase::default())
}

#[derive(Default)]
struct Showcase {
    frame: u64,
    stripes: Option<TextureId>,
}

impl App for Showcase {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let stripes = *self.stripes.get_or_insert_with(|| {
            let (view, sampler) = stripe_texture(ctx.gpu.device(), ctx.gpu.queue());
            ctx.pipeline.register_texture(ctx.gpu.device(), &view, &sampler)
        });

        self.frame += 1;
        let t = (self.frame % 600) as f32 / 600.0;

        ctx.render(Color::from_srgb_u8(18, 18, 24, 255), |canvas| {
            draw_gradients(canvas);
            draw_spinner(canvas, t)?;
            draw_clipped_lines(canvas, t)?;
            draw_textured_lines(canvas, stripes);
            Ok(())
        })
    }

    fn on_window_closed(&mut self, _window_id: WindowId) {
        self.stripes = None;
    }
}

fn draw_gradients(canvas: &mut Canvas<'_>) {
    let panel = [
        Vec2::new(40.0, 40.0),
        Vec2::new(440.0, 40.0),
        Vec2::new(40.0, 280.0),
        Vec2::new(440.0, 40.0),
        Vec2::new(440.0, 280.0),
        Vec2::new(40.0, 280.0),
    ];
    let gradient = Gradient::new(
        Color::from_srgb_u8(220, 60, 60, 255),
        Color::from_srgb_u8(60, 200, 90, 255),
        Color::from_srgb_u8(60, 90, 220, 255),
        Color::from_srgb_u8(240, 220, 80, 255),
    );
    let colors = canvas.get_gradient_colors(&panel, &gradient);
    canvas.triangle_batcher().fill_triangles_colored(&panel, &colors);

    let band = [
        Vec2::new(40.0, 320.0),
        Vec2::new(440.0, 320.0),
        Vec2::new(40.0, 336.0),
        Vec2::new(440.0, 320.0),
        Vec2::new(440.0, 336.0),
        Vec2::new(40.0, 336.0),
    ];
    let fade = Gradient::horizontal(Color::WHITE, Color::TRANSPARENT);
    let colors = canvas.get_gradient_colors(&band, &fade);
    canvas.triangle_batcher().fill_triangles_colored(&band, &colors);

    let dots: Vec<Vec2> = (0..=40).map(|i| Vec2::new(40.0 + i as f32 * 10.0, 300.0)).collect();
    canvas.point_batcher().draw_points(&dots, Color::WHITE);
}

fn draw_spinner(canvas: &mut Canvas<'_>, t: f32) -> Result<()> {
    canvas.push_modelview(Mat4::from_translation(vec3(700.0, 160.0, 0.0)));

    for i in 0..8 {
        let angle = t * TAU + i as f32 * TAU / 8.0;
        let base = *canvas.modelview();
        canvas.push_modelview(base * Mat4::from_rotation_z(angle));
        let shade = (i as f32 + 1.0) / 8.0;
        canvas
            .triangle_batcher()
            .fill_rect(Rect::new(40.0, -6.0, 60.0, 12.0), Color::from_straight(0.9, 0.6, 0.2, shade));
        canvas.pop_modelview()?;
    }

    canvas.pop_modelview()?;
    Ok(())
}

fn draw_clipped_lines(canvas: &mut Canvas<'_>, t: f32) -> Result<()> {
    canvas.push_cliprect(Rect::new(520.0, 340.0, 380.0, 260.0));
    canvas.push_cliprect(Rect::new(480.0, 380.0, 300.0, 300.0));

    let sweep = t * 380.0;
    let lines: Vec<Vec2> = (0..30)
        .flat_map(|i| {
            let x = 480.0 + i as f32 * 16.0 + sweep - 190.0;
            [Vec2::new(x, 320.0), Vec2::new(x + 120.0, 640.0)]
        })
        .collect();
    canvas.line_batcher().draw_lines(&lines, Color::from_srgb_u8(120, 200, 255, 255));
    canvas.pop_cliprect()?;

    let frame = [
        Vec2::new(520.0, 340.0),
        Vec2::new(900.0, 340.0),
        Vec2::new(900.0, 600.0),
        Vec2::new(520.0, 600.0),
    ];
    canvas.line_batcher().draw_line_loop(&frame, Color::WHITE);
    canvas.pop_cliprect()?;

    log::trace!("clipped lines drawn with {:?} active", canvas.active_batcher());
    Ok(())
}

fn draw_textured_lines(canvas: &mut Canvas<'_>, stripes: TextureId) {
    for i in 0..12 {
        let y = 360.0 + i as f32 * 20.0;
        let positions = [Vec2::new(40.0, y), Vec2::new(440.0, y)];
        let tex_coords = [Vec2::new(0.0, 0.5), Vec2::new(8.0, 0.5)];
        canvas
            .line_texture_batcher()
            .draw_lines(&positions, &tex_coords, Color::WHITE, stripes);
    }
}

/// 2x1 black/white texture repeated along textured lines.
fn stripe_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> (wgpu::TextureView, wgpu::Sampler) {
    let size = wgpu::Extent3d { width: 2, height: 1, depth_or_array_layers: 1 };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("studio stripes"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let texels: [u8; 8] = [255, 255, 255, 255, 0, 0, 0, 255];
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &texels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(8),
            rows_per_image: Some(1),
        },
        size,
    );

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("studio stripes sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    (texture.create_view(&wgpu::TextureViewDescriptor::default()), sampler)
}
