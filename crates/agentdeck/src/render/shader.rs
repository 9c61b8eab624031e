//! Animated blob shader behind the cover slide, drawn through eframe's glow backend.

use std::sync::Arc;

use eframe::egui;
use eframe::egui_glow;
use eframe::glow::{self, HasContext};

use super::background::{RenderSurface, SurfaceError};

const VERTEX_SHADER: &str = r#"
const vec2 verts[6] = vec2[6](
    vec2(-1.0, -1.0), vec2(1.0, -1.0), vec2(-1.0, 1.0),
    vec2(-1.0, 1.0), vec2(1.0, -1.0), vec2(1.0, 1.0)
);
out vec2 v_uv;
void main() {
    vec2 p = verts[gl_VertexID];
    v_uv = p * 0.5 + 0.5;
    gl_Position = vec4(p, 0.0, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"
#ifdef GL_ES
precision mediump float;
#endif
uniform float u_time;
uniform vec2 u_resolution;
in vec2 v_uv;
out vec4 out_color;
void main() {
    float aspect = u_resolution.x / max(u_resolution.y, 1.0);
    vec2 p = (v_uv - 0.5) * vec2(aspect, 1.0);
    float field = 0.0;
    for (int i = 0; i < 4; i++) {
        float fi = float(i);
        vec2 c = 0.3 * vec2(sin(u_time * 0.21 + fi * 1.7), cos(u_time * 0.17 + fi * 2.3));
        vec2 d = p - c;
        field += 0.035 / (dot(d, d) + 0.02);
    }
    vec3 base = vec3(0.102);
    vec3 warm = vec3(0.851, 0.467, 0.341) * 0.55;
    float glow = smoothstep(0.6, 2.4, field);
    out_color = vec4(mix(base, warm, glow * 0.6), 1.0);
}
"#;

pub struct ShaderSurface {
    gl: Option<Arc<glow::Context>>,
    resources: Option<GlResources>,
}

struct GlResources {
    program: glow::Program,
    vertex_array: glow::VertexArray,
    u_time: glow::UniformLocation,
    u_resolution: glow::UniformLocation,
}

impl ShaderSurface {
    /// `gl` is `None` when eframe runs on a non-glow renderer; mounting then fails.
    pub fn new(gl: Option<Arc<glow::Context>>) -> Self {
        Self {
            gl,
            resources: None,
        }
    }
}

impl RenderSurface for ShaderSurface {
    fn name(&self) -> &'static str {
        "shader"
    }

    fn mount(&mut self) -> Result<(), SurfaceError> {
        if self.resources.is_some() {
            return Ok(());
        }
        let gl = self.gl.as_ref().ok_or(SurfaceError::NoContext)?;
        self.resources = Some(unsafe { create_resources(gl)? });
        Ok(())
    }

    fn paint(&mut self, painter: &egui::Painter, rect: egui::Rect, seconds: f32) {
        let Some(res) = &self.resources else {
            return;
        };
        let program = res.program;
        let vertex_array = res.vertex_array;
        let u_time = res.u_time.clone();
        let u_resolution = res.u_resolution.clone();

        let callback = egui_glow::CallbackFn::new(move |info, painter| {
            let viewport = info.viewport_in_pixels();
            let gl = painter.gl();
            unsafe {
                gl.use_program(Some(program));
                gl.uniform_1_f32(Some(&u_time), seconds);
                gl.uniform_2_f32(
                    Some(&u_resolution),
                    viewport.width_px as f32,
                    viewport.height_px as f32,
                );
                gl.bind_vertex_array(Some(vertex_array));
                gl.draw_arrays(glow::TRIANGLES, 0, 6);
                gl.bind_vertex_array(None);
                gl.use_program(None);
            }
        });
        painter.add(egui::PaintCallback {
            rect,
            callback: Arc::new(callback),
        });
    }

    fn unmount(&mut self) {
        if let (Some(gl), Some(res)) = (&self.gl, self.resources.take()) {
            unsafe {
                gl.delete_program(res.program);
                gl.delete_vertex_array(res.vertex_array);
            }
        }
    }
}

impl Drop for ShaderSurface {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Deletes a shader object when dropped.
struct ShaderGuard<'a> {
    gl: &'a glow::Context,
    shader: glow::Shader,
}

impl Drop for ShaderGuard<'_> {
    fn drop(&mut self) {
        unsafe { self.gl.delete_shader(self.shader) }
    }
}

/// Deletes a program when dropped, unless it was kept.
struct ProgramGuard<'a> {
    gl: &'a glow::Context,
    program: glow::Program,
    armed: bool,
}

impl ProgramGuard<'_> {
    fn keep(mut self) -> glow::Program {
        self.armed = false;
        self.program
    }
}

impl Drop for ProgramGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            unsafe { self.gl.delete_program(self.program) }
        }
    }
}

unsafe fn compile<'a>(
    gl: &'a glow::Context,
    kind: u32,
    stage: &'static str,
    source: &str,
) -> Result<ShaderGuard<'a>, SurfaceError> {
    let version = egui_glow::ShaderVersion::get(gl);
    let shader = unsafe { gl.create_shader(kind) }.map_err(SurfaceError::Resource)?;
    let guard = ShaderGuard { gl, shader };
    unsafe {
        gl.shader_source(shader, &format!("{}\n{source}", version.version_declaration()));
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            return Err(SurfaceError::Compile {
                stage,
                log: gl.get_shader_info_log(shader),
            });
        }
    }
    Ok(guard)
}

unsafe fn create_resources(gl: &glow::Context) -> Result<GlResources, SurfaceError> {
    let version = egui_glow::ShaderVersion::get(gl);
    if !version.is_new_shader_interface() {
        return Err(SurfaceError::Unsupported(
            "GLSL without in/out shader interface".to_string(),
        ));
    }

    let vertex = unsafe { compile(gl, glow::VERTEX_SHADER, "vertex", VERTEX_SHADER)? };
    let fragment = unsafe { compile(gl, glow::FRAGMENT_SHADER, "fragment", FRAGMENT_SHADER)? };

    let program = unsafe { gl.create_program() }.map_err(SurfaceError::Resource)?;
    let program = ProgramGuard {
        gl,
        program,
        armed: true,
    };
    unsafe {
        gl.attach_shader(program.program, vertex.shader);
        gl.attach_shader(program.program, fragment.shader);
        gl.link_program(program.program);
        gl.detach_shader(program.program, vertex.shader);
        gl.detach_shader(program.program, fragment.shader);
        if !gl.get_program_link_status(program.program) {
            return Err(SurfaceError::Link(gl.get_program_info_log(program.program)));
        }
    }

    let uniform = |name: &'static str| {
        unsafe { gl.get_uniform_location(program.program, name) }
            .ok_or(SurfaceError::MissingUniform(name))
    };
    let u_time = uniform("u_time")?;
    let u_resolution = uniform("u_resolution")?;

    let vertex_array = unsafe { gl.create_vertex_array() }.map_err(SurfaceError::Resource)?;

    Ok(GlResources {
        program: program.keep(),
        vertex_array,
        u_time,
        u_resolution,
    })
}
