use std::rc::Rc;

use rand::Rng;

use crate::{
    animation::CubeRotation,
    camera::Camera,
    config::CubeConfig,
    fragments::spawn_default_fragments,
    page::{HostSize, Page, SurfaceLayout},
    scene_builder::{build_cube_scene, CubeNodes},
    scene_graph::Scene,
    scroll::{ScrollRotation, SectionRect},
};

/// Animation context for one mounted cube. Owns the scene, the camera, and the
/// scroll offset cell; the frame callback and the listeners only ever talk to
/// this.
pub struct SkillsCube {
    pub config: CubeConfig,
    pub scene: Scene,
    pub camera: Camera,
    pub layout: SurfaceLayout,
    pub nodes: CubeNodes,
    scroll: Rc<ScrollRotation>,
}

impl SkillsCube {
    pub fn new(config: CubeConfig, host: HostSize, device_pixel_ratio: f64) -> Self {
        let layout = SurfaceLayout::new(host, &config, device_pixel_ratio);
        let camera = Camera::perspective(
            config.camera_fov_degrees,
            layout.host.aspect(),
            config.camera_distance,
        );
        let (scene, nodes) = build_cube_scene(&config);
        let scroll = Rc::new(ScrollRotation::new(config.scroll_range));

        let mut cube = Self {
            config,
            scene,
            camera,
            layout,
            nodes,
            scroll,
        };
        cube.advance(0.0);
        cube
    }

    /// Shared handle for the scroll listener, the only writer of the offset.
    pub fn scroll_rotation(&self) -> Rc<ScrollRotation> {
        self.scroll.clone()
    }

    pub fn on_scroll(&self, section: Option<SectionRect>, viewport_height: f64) {
        self.scroll.update(section, viewport_height);
    }

    /// Poses the cube for `time` seconds since mount.
    pub fn advance(&mut self, time: f32) {
        let offset = self.scroll.offset();

        self.scene.set_object_rotation(
            self.nodes.group,
            CubeRotation::group(&self.config, time, offset),
        );
        self.scene.set_object_rotation(
            self.nodes.inner_wire,
            CubeRotation::inner(&self.config, time),
        );

        self.scene.update();
    }

    /// Refits camera and surface to a resized host. Returns the new drawing
    /// buffer size.
    pub fn resize(&mut self, host: HostSize, device_pixel_ratio: f64) -> (u32, u32) {
        self.layout = SurfaceLayout::new(host, &self.config, device_pixel_ratio);
        self.camera
            .set_aspect(self.layout.host.width, self.layout.host.height);
        self.layout.physical_size()
    }

    pub fn group_rotation(&self) -> CubeRotation {
        self.scene
            .get_object(self.nodes.group)
            .map(|group| group.transform.rotation())
            .unwrap_or(CubeRotation::ZERO)
    }
}

pub struct MountedCube<S> {
    pub cube: SkillsCube,
    pub surface: S,
    pub fragments_attached: bool,
}

/// Builds the cube into `page`.
///
/// Returns `Ok(None)` without touching the page when the host element is
/// missing or already carries a cube.
pub fn mount<P: Page>(
    page: &mut P,
    config: CubeConfig,
    rng: &mut impl Rng,
) -> anyhow::Result<Option<MountedCube<P::Surface>>> {
    let Some(host) = page.element_size(&config.host_id) else {
        log::debug!("No #{} element, skipping skills cube", config.host_id);
        return Ok(None);
    };

    if page.has_surface(&config.host_id) {
        log::warn!("#{} already has a cube, not mounting twice", config.host_id);
        return Ok(None);
    }

    let cube = SkillsCube::new(config, host, page.device_pixel_ratio());

    let fragments = spawn_default_fragments(rng);
    let fragment_count = fragments.len();
    let fragments_attached = page.attach_fragments(&cube.config.background_selector, fragments)?;
    if fragments_attached {
        log::debug!("Spawned {} code fragments", fragment_count);
    } else {
        log::debug!(
            "No {} element, skipping code fragments",
            cube.config.background_selector
        );
    }

    let surface = match page.attach_surface(&cube.config.host_id, &cube.layout) {
        Ok(surface) => surface,
        Err(e) => {
            page.remove_fragments();
            return Err(e);
        }
    };

    cube.on_scroll(
        page.section_rect(&cube.config.section_id),
        page.viewport_height(),
    );

    log::info!(
        "Mounted skills cube at {}x{} ({:.1}x pixel ratio)",
        cube.layout.host.width,
        cube.layout.host.height,
        cube.layout.pixel_ratio
    );

    Ok(Some(MountedCube {
        cube,
        surface,
        fragments_attached,
    }))
}

/// Takes everything `mount` added back out of `page`.
pub fn unmount<P: Page>(page: &mut P, surface: P::Surface) {
    page.remove_surface(surface);
    page.remove_fragments();
    log::info!("Unmounted skills cube");
}
