//! Home-screen layout: the five zones, the object each one owns, and how
//! those objects are textured.
//!
//! Screen coordinates are in points on a 390 × 844 portrait screen, y down.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::cube::AxisLattice;
use crate::error::{Error, Result};
use crate::geometry::{Boundary, Face};
use crate::grid::Element;
use crate::movement::MoveEvent;
use crate::prism::{PrismShape, SingleAxisLattice};
use crate::router::{GestureRouter, Zone};
use crate::Rotatable;

pub const SCREEN_WIDTH: f64 = 390.0;
pub const SCREEN_HEIGHT: f64 = 844.0;

pub const BOUND_VIEW: Boundary = Boundary::new(0.0, SCREEN_HEIGHT, 0.0, SCREEN_WIDTH);
pub const BOUND_TOP: Boundary = Boundary::new(33.0, 130.0, 18.0, 362.0);
pub const BOUND_TOP_LEFT: Boundary = Boundary::new(130.1, 306.0, 18.0, 188.5);
pub const BOUND_TOP_RIGHT: Boundary = Boundary::new(130.1, 306.0, 188.6, 362.0);
pub const BOUND_CENTER: Boundary = Boundary::new(306.1, 656.5, 18.0, 362.0);
pub const BOUND_BOT: Boundary = Boundary::new(656.5, 750.0, 18.0, 362.0);

/// Material every cube starts with before texturing.
pub const CUBE_FILL: &str = "black";
/// Material every prism starts with before texturing.
pub const PRISM_FILL: &str = "white";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    Top,
    TopLeft,
    TopRight,
    Center,
    Bottom,
}

/// Zones of the home screen, in the order the router checks them.
pub const HOME_ZONES: [ZoneKind; 5] = [
    ZoneKind::Top,
    ZoneKind::TopLeft,
    ZoneKind::TopRight,
    ZoneKind::Center,
    ZoneKind::Bottom,
];

impl ZoneKind {
    pub fn boundary(self) -> Boundary {
        match self {
            ZoneKind::Top => BOUND_TOP,
            ZoneKind::TopLeft => BOUND_TOP_LEFT,
            ZoneKind::TopRight => BOUND_TOP_RIGHT,
            ZoneKind::Center => BOUND_CENTER,
            ZoneKind::Bottom => BOUND_BOT,
        }
    }

    pub fn object_layout(self) -> &'static ObjectLayout {
        match self {
            ZoneKind::Top => &TOP_PRISM,
            ZoneKind::TopLeft => &TOP_LEFT_CUBE,
            ZoneKind::TopRight => &TOP_RIGHT_CUBE,
            ZoneKind::Center => &CENTER_CUBE,
            ZoneKind::Bottom => &BOTTOM_PRISM,
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZoneKind::Top => "top",
            ZoneKind::TopLeft => "top-left",
            ZoneKind::TopRight => "top-right",
            ZoneKind::Center => "center",
            ZoneKind::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

impl FromStr for ZoneKind {
    type Err = String;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        HOME_ZONES
            .into_iter()
            .find(|kind| kind.to_string() == name)
            .ok_or_else(|| {
                let known: Vec<String> = HOME_ZONES.iter().map(ToString::to_string).collect();
                format!("unknown zone `{name}`, expected one of: {}", known.join(", "))
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Cube(usize),
    Prism(PrismShape),
}

/// Image families an object is textured with. Each family expands through
/// [`sequential_images`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Texturing {
    /// One family per face, in [`Face::ALL`] order.
    CubeFaces {
        families: [&'static str; 6],
        count: usize,
    },
    /// A tessellated prism: one run around the sides, one across the top.
    PrismBoxes {
        sides: &'static str,
        top: &'static str,
        count: usize,
    },
    /// A slab wrapped on its four sides.
    PrismWrap { family: &'static str, count: usize },
}

/// Where a renderer places an object, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: [f64; 3],
    pub scale: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectLayout {
    pub shape: Shape,
    pub texturing: Texturing,
    pub placement: Placement,
}

pub const CENTER_CUBE: ObjectLayout = ObjectLayout {
    shape: Shape::Cube(4),
    texturing: Texturing::CubeFaces {
        families: ["black", "red", "green", "white", "purple", "blue"],
        count: 16,
    },
    placement: Placement {
        position: [0.0, 9.1, 0.0],
        scale: 1.0,
    },
};

pub const TOP_LEFT_CUBE: ObjectLayout = ObjectLayout {
    shape: Shape::Cube(1),
    texturing: Texturing::CubeFaces {
        families: ["widget1", "widget2", "widget3", "widget4", "widget5", "widget6"],
        count: 1,
    },
    placement: Placement {
        position: [-1.037, 12.2, 1.0],
        scale: 1.98,
    },
};

pub const TOP_RIGHT_CUBE: ObjectLayout = ObjectLayout {
    shape: Shape::Cube(2),
    texturing: Texturing::CubeFaces {
        families: ["app1", "app2", "app3", "app4", "app5", "app6"],
        count: 4,
    },
    placement: Placement {
        position: [1.0, 12.2, 1.0],
        scale: 1.0,
    },
};

pub const BOTTOM_PRISM: ObjectLayout = ObjectLayout {
    shape: Shape::Prism(PrismShape::Tessellated { width: 4, depth: 4 }),
    texturing: Texturing::PrismBoxes {
        sides: "bot",
        top: "al",
        count: 16,
    },
    placement: Placement {
        position: [0.0, 6.5, 0.0],
        scale: 1.0,
    },
};

pub const TOP_PRISM: ObjectLayout = ObjectLayout {
    shape: Shape::Prism(PrismShape::Slab),
    texturing: Texturing::PrismWrap {
        family: "rect",
        count: 4,
    },
    placement: Placement {
        position: [0.0, 13.8, 0.0],
        scale: 1.0,
    },
};

/// Numbered image names: `common1` through `commonN`, or just `common` for a
/// single image.
pub fn sequential_images(common: &str, count: usize) -> Vec<String> {
    match count {
        1 => vec![common.to_string()],
        _ => (1..=count).map(|index| format!("{common}{index}")).collect(),
    }
}

/// A built lattice object of either kind.
#[derive(Clone)]
pub enum SceneObject {
    Cube(Arc<AxisLattice<String>>),
    Prism(Arc<SingleAxisLattice<String>>),
}

impl SceneObject {
    /// Builds and textures the object described by `layout`, sized to `boundary`.
    pub fn build(layout: &ObjectLayout, boundary: Boundary) -> Result<Self> {
        let extent = boundary.extent();
        match (layout.shape, layout.texturing) {
            (Shape::Cube(dim), Texturing::CubeFaces { families, count }) => {
                let cube = AxisLattice::new(dim, extent, CUBE_FILL.to_string())?;
                for (face, family) in Face::ALL.into_iter().zip(families) {
                    cube.apply_face_images(face, &sequential_images(family, count))?;
                }
                Ok(SceneObject::Cube(Arc::new(cube)))
            }
            (Shape::Prism(shape), Texturing::PrismBoxes { sides, top, count }) => {
                let prism = SingleAxisLattice::new(shape, extent, PRISM_FILL.to_string())?;
                prism.apply_side_images(&sequential_images(sides, count))?;
                prism.apply_top_images(&sequential_images(top, count))?;
                Ok(SceneObject::Prism(Arc::new(prism)))
            }
            (Shape::Prism(shape), Texturing::PrismWrap { family, count }) => {
                let prism = SingleAxisLattice::new(shape, extent, PRISM_FILL.to_string())?;
                prism.apply_images(&sequential_images(family, count));
                Ok(SceneObject::Prism(Arc::new(prism)))
            }
            (shape, texturing) => Err(Error::TexturingMismatch {
                shape: format!("{shape:?}"),
                texturing: format!("{texturing:?}"),
            }),
        }
    }

    pub fn rotatable(&self) -> Arc<dyn Rotatable> {
        match self {
            SceneObject::Cube(cube) => Arc::clone(cube) as Arc<dyn Rotatable>,
            SceneObject::Prism(prism) => prism.clone(),
        }
    }

    pub fn elements(&self) -> Vec<Element<String>> {
        match self {
            SceneObject::Cube(cube) => cube.elements(),
            SceneObject::Prism(prism) => prism.elements(),
        }
    }

    /// Element centers as currently shown, live rotation included.
    pub fn element_centers(&self) -> Vec<[f64; 3]> {
        match self {
            SceneObject::Cube(cube) => cube.element_centers(),
            SceneObject::Prism(prism) => prism.element_centers(),
        }
    }

    pub fn is_moving(&self) -> bool {
        match self {
            SceneObject::Cube(cube) => cube.is_moving(),
            SceneObject::Prism(prism) => prism.is_moving(),
        }
    }

    pub fn drain_events(&self) -> Vec<MoveEvent> {
        self.rotatable().drain_events()
    }

    pub fn format(&self) -> String {
        match self {
            SceneObject::Cube(cube) => cube.format(),
            SceneObject::Prism(prism) => prism.format(),
        }
    }
}

/// Every object on screen plus the router that drives them.
pub struct Scene {
    pub objects: Vec<(ZoneKind, SceneObject)>,
    pub router: GestureRouter,
}

impl Scene {
    /// The home screen with all five objects.
    pub fn home() -> Result<Self> {
        Self::build(&HOME_ZONES)
    }

    /// Builds the objects of `kinds` and a router over their zones, checked
    /// in the given order.
    pub fn build(kinds: &[ZoneKind]) -> Result<Self> {
        let mut objects = Vec::with_capacity(kinds.len());
        let mut zones = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let object = SceneObject::build(kind.object_layout(), kind.boundary())?;
            zones.push(Zone::new(kind.boundary(), object.rotatable()));
            objects.push((kind, object));
        }
        let router = GestureRouter::new(BOUND_VIEW, zones)?;
        Ok(Self { objects, router })
    }

    pub fn object(&self, kind: ZoneKind) -> Option<&SceneObject> {
        self.objects
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, object)| object)
    }

    /// The zone under a screen point, if any.
    pub fn zone_at(&self, location: crate::geometry::Point) -> Option<ZoneKind> {
        self.router
            .zone_at(location)
            .map(|index| self.objects[index].0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, QuarterTurn};
    use crate::movement::MoveEvent;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_sequential_images() {
        assert_eq!(sequential_images("app", 3), vec!["app1", "app2", "app3"]);
        assert_eq!(sequential_images("widget4", 1), vec!["widget4"]);
        assert!(sequential_images("none", 0).is_empty());
    }

    #[test]
    fn test_home_zones_do_not_overlap() {
        for (index, kind) in HOME_ZONES.iter().enumerate() {
            assert!(BOUND_VIEW.contains(Point::new(
                kind.boundary().left,
                kind.boundary().top
            )));
            for other in &HOME_ZONES[index + 1..] {
                assert!(
                    !kind.boundary().overlaps(&other.boundary()),
                    "{kind} overlaps {other}"
                );
            }
        }
    }

    #[test]
    fn test_zone_names_round_trip() {
        for kind in HOME_ZONES {
            assert_eq!(kind.to_string().parse::<ZoneKind>(), Ok(kind));
        }
        assert!("middle".parse::<ZoneKind>().is_err());
    }

    #[test]
    fn test_home_scene_routes_points_to_zones() {
        let scene = Scene::home().unwrap();
        assert_eq!(scene.objects.len(), 5);
        assert_eq!(scene.zone_at(Point::new(100.0, 80.0)), Some(ZoneKind::Top));
        assert_eq!(scene.zone_at(Point::new(100.0, 200.0)), Some(ZoneKind::TopLeft));
        assert_eq!(scene.zone_at(Point::new(300.0, 200.0)), Some(ZoneKind::TopRight));
        assert_eq!(scene.zone_at(Point::new(200.0, 500.0)), Some(ZoneKind::Center));
        assert_eq!(scene.zone_at(Point::new(200.0, 700.0)), Some(ZoneKind::Bottom));
        // shared edge between center and bottom belongs to center
        assert_eq!(scene.zone_at(Point::new(200.0, 656.5)), Some(ZoneKind::Center));
        // margins and off screen
        assert_eq!(scene.zone_at(Point::new(5.0, 500.0)), None);
        assert_eq!(scene.zone_at(Point::new(200.0, 800.0)), None);
        assert_eq!(scene.zone_at(Point::new(200.0, 900.0)), None);
    }

    #[test]
    fn test_cubes_are_textured_per_face() {
        let scene = Scene::home().unwrap();
        let Some(SceneObject::Cube(cube)) = scene.object(ZoneKind::TopRight) else {
            panic!("top-right should hold a cube");
        };
        let elements = cube.elements();
        assert_eq!(elements.len(), 8);
        let dims = cube.dims();
        let front: FxHashSet<&str> = elements
            .iter()
            .filter(|element| Face::Front.covers(element.position, dims))
            .map(|element| element.face(Face::Front).as_str())
            .collect();
        assert_eq!(
            front,
            FxHashSet::from_iter(["app11", "app12", "app13", "app14"])
        );
        // every face got its own family; inner slots keep the fill
        let families = ["app1", "app2", "app3", "app4", "app5", "app6"];
        for (face, family) in Face::ALL.into_iter().zip(families) {
            for element in &elements {
                let image = element.face(face);
                if face.covers(element.position, dims) {
                    assert!(image.starts_with(family), "{face}: {image}");
                } else {
                    assert_eq!(image, CUBE_FILL);
                }
            }
        }
    }

    #[test]
    fn test_mismatched_texturing_is_rejected() {
        let layout = ObjectLayout {
            shape: Shape::Cube(2),
            ..TOP_PRISM
        };
        assert!(matches!(
            SceneObject::build(&layout, BOUND_TOP),
            Err(Error::TexturingMismatch { .. })
        ));
        let layout = ObjectLayout {
            shape: Shape::Prism(PrismShape::Slab),
            ..TOP_RIGHT_CUBE
        };
        assert!(matches!(
            SceneObject::build(&layout, BOUND_TOP),
            Err(Error::TexturingMismatch { .. })
        ));
    }

    #[test]
    fn test_single_cube_shows_one_widget_per_face() {
        let scene = Scene::home().unwrap();
        let Some(SceneObject::Cube(cube)) = scene.object(ZoneKind::TopLeft) else {
            panic!("top-left should hold a cube");
        };
        let elements = cube.elements();
        assert_eq!(elements.len(), 1);
        assert_eq!(
            elements[0].faces,
            ["widget1", "widget2", "widget3", "widget4", "widget5", "widget6"].map(String::from)
        );
    }

    #[test]
    fn test_bottom_prism_sides_and_top() {
        let scene = Scene::home().unwrap();
        let Some(SceneObject::Prism(prism)) = scene.object(ZoneKind::Bottom) else {
            panic!("bottom should hold a prism");
        };
        let elements = prism.elements();
        assert_eq!(elements.len(), 16);
        let tops: Vec<&str> = elements
            .iter()
            .map(|element| element.face(Face::Top).as_str())
            .collect();
        assert_eq!(tops, sequential_images("al", 16));

        let mut sides: Vec<String> = Vec::new();
        for face in [Face::Front, Face::Left, Face::Right, Face::Back] {
            for element in &elements {
                let image = element.face(face);
                if image.starts_with("bot") {
                    sides.push(image.clone());
                }
            }
        }
        sides.sort();
        let mut expected = sequential_images("bot", 16);
        expected.sort();
        assert_eq!(sides, expected);
    }

    #[test]
    fn test_top_slab_is_wrapped() {
        let scene = Scene::home().unwrap();
        let Some(SceneObject::Prism(prism)) = scene.object(ZoneKind::Top) else {
            panic!("top should hold a prism");
        };
        let elements = prism.elements();
        assert_eq!(elements.len(), 1);
        assert_eq!(
            elements[0].faces,
            ["rect1", "rect2", "rect3", "rect4", PRISM_FILL, PRISM_FILL].map(String::from)
        );
    }

    #[test]
    fn test_drag_across_center_turns_a_row() {
        let mut scene = Scene::home().unwrap();
        let start = Point::new(40.0, 640.0);
        let extent = BOUND_CENTER.extent();
        for step in 1..=10 {
            let x = start.x + extent.x * 0.9 * step as f64 / 10.0;
            scene.router.on_changed(start, Point::new(x, 641.0)).unwrap();
        }
        scene.router.on_ended().unwrap();

        let center = scene.object(ZoneKind::Center).unwrap();
        assert!(!center.is_moving());
        let events = center.drain_events();
        assert!(matches!(
            events.first(),
            Some(MoveEvent::Grabbed { slice: Some(0), .. })
        ));
        assert!(events.iter().any(|event| matches!(
            event,
            MoveEvent::Rehomed {
                turn: QuarterTurn::Forward,
                ..
            }
        )));
        // nothing else moved
        for kind in [ZoneKind::Top, ZoneKind::TopLeft, ZoneKind::TopRight, ZoneKind::Bottom] {
            assert!(scene.object(kind).unwrap().drain_events().is_empty());
        }
    }
}
