use crate::contract::{Shape, Variant};
use crate::error::{Result, ShopError};
use crate::validate;
use serde::Serialize;
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Result<Self> {
        validate::positive("radius", radius)?;
        Ok(Self { radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Variant for Circle {
    fn kind(&self) -> &'static str {
        "Circle"
    }

    fn label(&self) -> String {
        format!("Circle(r={})", self.radius)
    }
}

impl Shape for Circle {
    fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    fn perimeter(&self) -> f64 {
        2.0 * PI * self.radius
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rectangle {
    width: f64,
    height: f64,
}

impl Rectangle {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        validate::positive("width", width)?;
        validate::positive("height", height)?;
        Ok(Self { width, height })
    }
}

impl Variant for Rectangle {
    fn kind(&self) -> &'static str {
        "Rectangle"
    }

    fn label(&self) -> String {
        format!("Rectangle({}x{})", self.width, self.height)
    }
}

impl Shape for Rectangle {
    fn area(&self) -> f64 {
        self.width * self.height
    }

    fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Square {
    side: f64,
}

impl Square {
    pub fn new(side: f64) -> Result<Self> {
        validate::positive("side", side)?;
        Ok(Self { side })
    }
}

impl Variant for Square {
    fn kind(&self) -> &'static str {
        "Square"
    }
}

impl Shape for Square {
    fn area(&self) -> f64 {
        self.side * self.side
    }

    fn perimeter(&self) -> f64 {
        4.0 * self.side
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Triangle {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangle {
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self> {
        validate::positive("a", a)?;
        validate::positive("b", b)?;
        validate::positive("c", c)?;
        if a + b <= c || a + c <= b || b + c <= a {
            return Err(ShopError::validation(
                "sides",
                format!("{a}, {b}, {c} violate the triangle inequality"),
            ));
        }
        Ok(Self { a, b, c })
    }
}

impl Variant for Triangle {
    fn kind(&self) -> &'static str {
        "Triangle"
    }
}

impl Shape for Triangle {
    // Heron's formula
    fn area(&self) -> f64 {
        let s = self.perimeter() / 2.0;
        (s * (s - self.a) * (s - self.b) * (s - self.c)).sqrt()
    }

    fn perimeter(&self) -> f64 {
        self.a + self.b + self.c
    }
}
