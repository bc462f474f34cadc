use super::{Layout, LayoutKind, Pins, Position};
use crate::analysis::TaskGraph;
use crate::config::Config;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::f64::consts::PI;

const INITIAL_RADIUS: f64 = 10.0;
const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
const DISTANCE_MIN2: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
struct Body {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    fixed: Option<Position>,
}

struct Spring {
    source: usize,
    target: usize,
    strength: f64,
    bias: f64,
}

/// Force-directed placement in the manner of d3-force: link springs,
/// many-body repulsion and centering, integrated with velocity Verlet
/// while alpha cools to zero.
///
/// Initial positions follow a phyllotaxis spiral so the result is fully
/// deterministic for a given graph.
pub fn simulate(graph: &TaskGraph, config: &Config, pins: &Pins) -> Layout {
    let ids: Vec<&str> = graph.nodes().collect();
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let (cx, cy) = config.canvas.center();

    let mut bodies: Vec<Body> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
            let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
            let fixed = pins.get(*id).copied();
            let (x, y) = match fixed {
                Some(p) => (p.x, p.y),
                None => (cx + radius * angle.cos(), cy + radius * angle.sin()),
            };
            Body {
                x,
                y,
                vx: 0.0,
                vy: 0.0,
                fixed,
            }
        })
        .collect();

    let springs = build_springs(graph, &index);
    let iterations = config.force.iterations.max(1);
    let alpha_decay = 1.0 - ALPHA_MIN.powf(1.0 / iterations as f64);
    let mut alpha = 1.0;

    for _ in 0..iterations {
        alpha += (0.0 - alpha) * alpha_decay;

        apply_links(&mut bodies, &springs, config.force.link_distance, alpha);
        apply_charge(&mut bodies, config.force.charge, alpha);

        for body in bodies.iter_mut() {
            match body.fixed {
                Some(p) => {
                    body.x = p.x;
                    body.y = p.y;
                    body.vx = 0.0;
                    body.vy = 0.0;
                }
                None => {
                    body.vx *= 1.0 - VELOCITY_DECAY;
                    body.vy *= 1.0 - VELOCITY_DECAY;
                    body.x += body.vx;
                    body.y += body.vy;
                }
            }
        }

        apply_center(&mut bodies, cx, cy);
    }

    let positions: IndexMap<String, Position> = ids
        .iter()
        .zip(&bodies)
        .map(|(id, b)| (id.to_string(), Position::new(b.x, b.y)))
        .collect();

    Layout {
        kind: LayoutKind::Force,
        positions,
    }
}

fn build_springs(graph: &TaskGraph, index: &HashMap<&str, usize>) -> Vec<Spring> {
    let edges: Vec<(usize, usize)> = graph
        .edges()
        .iter()
        .filter_map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
        .filter(|(s, t)| s != t)
        .collect();

    let mut degree = vec![0usize; index.len()];
    for &(s, t) in &edges {
        degree[s] += 1;
        degree[t] += 1;
    }

    edges
        .into_iter()
        .map(|(source, target)| {
            let (ds, dt) = (degree[source] as f64, degree[target] as f64);
            Spring {
                source,
                target,
                strength: 1.0 / ds.min(dt),
                bias: ds / (ds + dt),
            }
        })
        .collect()
}

fn apply_links(bodies: &mut [Body], springs: &[Spring], distance: f64, alpha: f64) {
    for (n, spring) in springs.iter().enumerate() {
        let (s, t) = (bodies[spring.source], bodies[spring.target]);
        let mut dx = t.x + t.vx - s.x - s.vx;
        let mut dy = t.y + t.vy - s.y - s.vy;
        if dx == 0.0 {
            dx = jiggle(n, 0);
        }
        if dy == 0.0 {
            dy = jiggle(n, 1);
        }
        let len = (dx * dx + dy * dy).sqrt();
        let l = (len - distance) / len * alpha * spring.strength;
        dx *= l;
        dy *= l;

        let target = &mut bodies[spring.target];
        target.vx -= dx * spring.bias;
        target.vy -= dy * spring.bias;
        let source = &mut bodies[spring.source];
        source.vx += dx * (1.0 - spring.bias);
        source.vy += dy * (1.0 - spring.bias);
    }
}

fn apply_charge(bodies: &mut [Body], strength: f64, alpha: f64) {
    let n = bodies.len();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let mut dx = bodies[j].x - bodies[i].x;
            let mut dy = bodies[j].y - bodies[i].y;
            if dx == 0.0 {
                dx = jiggle(i, j);
            }
            if dy == 0.0 {
                dy = jiggle(j, i);
            }
            let mut l2 = dx * dx + dy * dy;
            if l2 < DISTANCE_MIN2 {
                l2 = (DISTANCE_MIN2 * l2).sqrt();
            }
            let w = strength * alpha / l2;
            bodies[i].vx += dx * w;
            bodies[i].vy += dy * w;
        }
    }
}

/// Shift free bodies so the mean of all bodies sits on the centre.
fn apply_center(bodies: &mut [Body], cx: f64, cy: f64) {
    if bodies.is_empty() || bodies.iter().all(|b| b.fixed.is_some()) {
        return;
    }
    let n = bodies.len() as f64;
    let sx = bodies.iter().map(|b| b.x).sum::<f64>() / n - cx;
    let sy = bodies.iter().map(|b| b.y).sum::<f64>() / n - cy;
    for body in bodies.iter_mut().filter(|b| b.fixed.is_none()) {
        body.x -= sx;
        body.y -= sy;
    }
}

/// Tiny deterministic offset used to separate coincident bodies.
fn jiggle(a: usize, b: usize) -> f64 {
    let h = (a as u64)
        .wrapping_mul(6364136223846793005)
        .wrapping_add(b as u64)
        .wrapping_mul(1442695040888963407);
    ((h >> 11) as f64 / (1u64 << 53) as f64 - 0.5) * 1e-6
}
