use std::collections::HashMap;

/// Axis-aligned rectangle given by its top-left corner and size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle from its left/top and right/bottom edges.
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            w: right - left,
            h: bottom - top,
        }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Non-negative origin and size, and far edges that fit in an `i32`.
    /// Any union of valid rectangles is then valid as well.
    pub fn is_valid(&self) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.w >= 0
            && self.h >= 0
            && self.x.checked_add(self.w).is_some()
            && self.y.checked_add(self.h).is_some()
    }

    /// True when the two rectangles share a region of strictly positive area.
    /// Rectangles that only touch along an edge or at a corner do not intersect.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.x.max(other.x) < self.right().min(other.right())
            && self.y.max(other.y) < self.bottom().min(other.bottom())
    }

    /// Like [`Rectangle::intersects`], but a shared edge or corner also counts.
    pub fn touches_or_intersects(&self, other: &Rectangle) -> bool {
        self.x.max(other.x) <= self.right().min(other.right())
            && self.y.max(other.y) <= self.bottom().min(other.bottom())
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    pub fn contains(&self, other: &Rectangle) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// A collection of rectangles. Order carries no meaning and duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxSet {
    boxes: Vec<Rectangle>,
}

impl BoxSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap any rectangles as-is. Validation is left to the consumer.
    pub fn from_rectangles(rects: impl IntoIterator<Item = Rectangle>) -> Self {
        Self {
            boxes: rects.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rectangle> {
        self.boxes.iter()
    }

    pub fn as_slice(&self) -> &[Rectangle] {
        &self.boxes
    }

    /// Multiset equality, ignoring order.
    pub fn same_rectangles(&self, other: &BoxSet) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut counts: HashMap<Rectangle, isize> = HashMap::new();
        for rect in &self.boxes {
            *counts.entry(*rect).or_default() += 1;
        }
        for rect in &other.boxes {
            *counts.entry(*rect).or_default() -= 1;
        }
        counts.values().all(|&c| c == 0)
    }
}

impl FromIterator<Rectangle> for BoxSet {
    fn from_iter<I: IntoIterator<Item = Rectangle>>(iter: I) -> Self {
        Self::from_rectangles(iter)
    }
}

impl IntoIterator for BoxSet {
    type Item = Rectangle;
    type IntoIter = std::vec::IntoIter<Rectangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.into_iter()
    }
}

impl<'a> IntoIterator for &'a BoxSet {
    type Item = &'a Rectangle;
    type IntoIter = std::slice::Iter<'a, Rectangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}

/// Outer contour of a foreground blob, reduced to its pixel extent and enclosed area.
#[derive(Debug, Clone)]
pub struct Contour {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    /// Polygon area enclosed by the contour, in square pixels
    pub area: f64,
}

impl Contour {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Bounding rectangle covering every pixel of the contour.
    pub fn bounding_rect(&self) -> Rectangle {
        Rectangle::new(
            self.min_x as i32,
            self.min_y as i32,
            self.width() as i32,
            self.height() as i32,
        )
    }
}
