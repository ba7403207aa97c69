use std::collections::HashMap;

use rand::{rngs::StdRng, SeedableRng};
use skills_cube::{
    config::CubeConfig,
    cube::{mount, unmount, MountedCube},
    fragments::{CodeFragment, FragmentTier, NORMAL_FRAGMENTS, ZOOMED_FRAGMENTS},
    lifecycle::CubeSlot,
    page::{HostSize, Page, SurfaceLayout},
    scroll::SectionRect,
};

/// In-memory document: a map of element sizes plus whatever the cube appended.
#[derive(Default)]
struct FakePage {
    elements: HashMap<String, HostSize>,
    selectors: Vec<String>,
    section: Option<(String, SectionRect)>,
    viewport_height: f64,
    next_canvas: usize,
    canvases: Vec<(usize, String, SurfaceLayout)>,
    fragment_layers: Vec<(String, Vec<CodeFragment>)>,
}

impl FakePage {
    fn with_host(width: f64, height: f64) -> Self {
        let mut page = FakePage {
            viewport_height: 800.0,
            ..Default::default()
        };
        page.elements
            .insert("skills-cube".to_string(), HostSize { width, height });
        page
    }
}

impl Page for FakePage {
    type Surface = usize;

    fn element_size(&self, id: &str) -> Option<HostSize> {
        self.elements.get(id).copied()
    }

    fn section_rect(&self, id: &str) -> Option<SectionRect> {
        self.section
            .as_ref()
            .filter(|(section_id, _)| section_id == id)
            .map(|(_, rect)| *rect)
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    fn has_surface(&self, host_id: &str) -> bool {
        self.canvases.iter().any(|(_, id, _)| id == host_id)
    }

    fn attach_surface(&mut self, host_id: &str, layout: &SurfaceLayout) -> anyhow::Result<usize> {
        let canvas = self.next_canvas;
        self.next_canvas += 1;
        self.canvases.push((canvas, host_id.to_string(), *layout));
        Ok(canvas)
    }

    fn attach_fragments(
        &mut self,
        selector: &str,
        fragments: Vec<CodeFragment>,
    ) -> anyhow::Result<bool> {
        if !self.selectors.iter().any(|s| s == selector) {
            return Ok(false);
        }
        self.fragment_layers.push((selector.to_string(), fragments));
        Ok(true)
    }

    fn remove_surface(&mut self, surface: usize) {
        self.canvases.retain(|(canvas, _, _)| *canvas != surface);
    }

    fn remove_fragments(&mut self) {
        self.fragment_layers.pop();
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn missing_host_leaves_page_untouched() {
    let mut page = FakePage {
        selectors: vec![".scroll-animation-container".to_string()],
        ..Default::default()
    };

    let mounted = mount(&mut page, CubeConfig::default(), &mut rng()).unwrap();

    assert!(mounted.is_none());
    assert!(page.canvases.is_empty());
    assert!(page.fragment_layers.is_empty());
}

#[test]
fn mounts_one_oversized_canvas() {
    let mut page = FakePage::with_host(400.0, 500.0);

    let mounted = mount(&mut page, CubeConfig::default(), &mut rng())
        .unwrap()
        .expect("host exists");

    assert_eq!(mounted.surface, 0);
    assert_eq!(page.canvases.len(), 1);
    assert_eq!(page.canvases[0].2.physical_size(), (520, 650));
    assert!(page.canvases[0].2.css_text().contains("pointer-events:none"));
    assert!(!mounted.fragments_attached);
}

#[test]
fn zero_sized_host_falls_back_to_defaults() {
    let mut page = FakePage::with_host(0.0, 0.0);

    let mounted = mount(&mut page, CubeConfig::default(), &mut rng())
        .unwrap()
        .unwrap();

    assert_eq!(
        mounted.cube.layout.host,
        HostSize {
            width: 460.0,
            height: 520.0
        }
    );
    assert!((mounted.cube.camera.aspect - 460.0 / 520.0).abs() < 1e-6);
}

#[test]
fn second_mount_is_refused() {
    let mut page = FakePage::with_host(460.0, 520.0);

    assert!(mount(&mut page, CubeConfig::default(), &mut rng())
        .unwrap()
        .is_some());
    assert!(mount(&mut page, CubeConfig::default(), &mut rng())
        .unwrap()
        .is_none());
    assert_eq!(page.canvases.len(), 1);
}

#[test]
fn fragments_fill_the_background_container() {
    let mut page = FakePage::with_host(460.0, 520.0);
    page.selectors
        .push(".scroll-animation-container".to_string());

    let mounted = mount(&mut page, CubeConfig::default(), &mut rng())
        .unwrap()
        .unwrap();
    assert!(mounted.fragments_attached);

    let (_, fragments) = &page.fragment_layers[0];
    assert_eq!(
        fragments.len(),
        NORMAL_FRAGMENTS.len() + ZOOMED_FRAGMENTS.len()
    );

    for fragment in fragments {
        let (left, top) = match fragment.tier {
            FragmentTier::Normal => (4.0..92.0, 4.0..92.0),
            FragmentTier::Zoomed => (20.0..65.0, 15.0..80.0),
        };
        assert!(left.contains(&fragment.left));
        assert!(top.contains(&fragment.top));
        assert!(fragment.delay <= 0.0);
    }
}

#[test]
fn initial_pose_reflects_current_scroll() {
    let mut page = FakePage::with_host(460.0, 520.0);
    page.section = Some((
        "skills".to_string(),
        SectionRect {
            top: -600.0,
            height: 2000.0,
        },
    ));

    let config = CubeConfig::default();
    let half_range = config.scroll_range * 0.5;
    let mut mounted = mount(&mut page, config, &mut rng()).unwrap().unwrap();

    mounted.cube.advance(0.0);
    let rotation = mounted.cube.group_rotation();
    assert!((rotation.y - half_range).abs() < 1e-5);
    assert!((rotation.x - (0.40 + half_range * 0.25)).abs() < 1e-5);
    assert_eq!(rotation.z, 0.0);
}

fn full_page() -> FakePage {
    let mut page = FakePage::with_host(460.0, 520.0);
    page.selectors
        .push(".scroll-animation-container".to_string());
    page
}

#[test]
fn unmount_takes_back_canvas_and_fragments() {
    let mut page = full_page();

    let mounted = mount(&mut page, CubeConfig::default(), &mut rng())
        .unwrap()
        .unwrap();
    assert_eq!(page.canvases.len(), 1);
    assert_eq!(page.fragment_layers.len(), 1);

    unmount(&mut page, mounted.surface);
    assert!(page.canvases.is_empty());
    assert!(page.fragment_layers.is_empty());
}

#[test]
fn remount_after_dispose_yields_a_single_cube() {
    let mut page = full_page();
    let mut slot = CubeSlot::<MountedCube<usize>>::default();

    for _ in 0..3 {
        let ticket = slot.begin().unwrap();
        let mounted = mount(&mut page, CubeConfig::default(), &mut rng())
            .unwrap()
            .unwrap();
        assert!(slot.finish(&ticket, mounted).is_ok());

        let running = slot.dispose().unwrap();
        unmount(&mut page, running.surface);
    }

    let ticket = slot.begin().unwrap();
    let mounted = mount(&mut page, CubeConfig::default(), &mut rng())
        .unwrap()
        .unwrap();
    assert!(slot.finish(&ticket, mounted).is_ok());

    assert_eq!(page.canvases.len(), 1);
    assert_eq!(page.fragment_layers.len(), 1);
    assert!(slot.begin().is_none());
}

#[test]
fn dispose_during_startup_leaves_nothing_behind() {
    let mut page = full_page();
    let mut slot = CubeSlot::<MountedCube<usize>>::default();

    let ticket = slot.begin().unwrap();
    let mounted = mount(&mut page, CubeConfig::default(), &mut rng())
        .unwrap()
        .unwrap();

    // GPU setup still pending when the page asks for a dispose
    assert!(slot.dispose().is_none());

    let cancelled = slot.finish(&ticket, mounted).err().unwrap();
    unmount(&mut page, cancelled.surface);

    assert!(slot.is_idle());
    assert!(page.canvases.is_empty());
    assert!(page.fragment_layers.is_empty());

    let ticket = slot.begin().unwrap();
    let mounted = mount(&mut page, CubeConfig::default(), &mut rng())
        .unwrap()
        .unwrap();
    assert!(slot.finish(&ticket, mounted).is_ok());
    assert_eq!(page.canvases.len(), 1);
    assert_eq!(page.fragment_layers.len(), 1);
}

#[test]
fn failed_surface_attach_removes_fragments() {
    struct NoCanvasPage(FakePage);

    impl Page for NoCanvasPage {
        type Surface = usize;

        fn element_size(&self, id: &str) -> Option<HostSize> {
            self.0.element_size(id)
        }

        fn section_rect(&self, id: &str) -> Option<SectionRect> {
            self.0.section_rect(id)
        }

        fn viewport_height(&self) -> f64 {
            self.0.viewport_height()
        }

        fn device_pixel_ratio(&self) -> f64 {
            self.0.device_pixel_ratio()
        }

        fn has_surface(&self, host_id: &str) -> bool {
            self.0.has_surface(host_id)
        }

        fn attach_surface(&mut self, _: &str, _: &SurfaceLayout) -> anyhow::Result<usize> {
            anyhow::bail!("no canvas support")
        }

        fn attach_fragments(
            &mut self,
            selector: &str,
            fragments: Vec<CodeFragment>,
        ) -> anyhow::Result<bool> {
            self.0.attach_fragments(selector, fragments)
        }

        fn remove_surface(&mut self, surface: usize) {
            self.0.remove_surface(surface)
        }

        fn remove_fragments(&mut self) {
            self.0.remove_fragments()
        }
    }

    let mut page = NoCanvasPage(full_page());
    assert!(mount(&mut page, CubeConfig::default(), &mut rng()).is_err());
    assert!(page.0.fragment_layers.is_empty());
    assert!(page.0.canvases.is_empty());
}
