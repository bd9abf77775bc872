// ============================================================================
// demos/listings.rs — Demo Showcase
// Code listings shown (and "run" line by line) next to each demo.
// ============================================================================

use super::DemoKind;

pub(super) fn listing(kind: DemoKind) -> &'static str {
    match kind {
        DemoKind::Particles => PARTICLES,
        DemoKind::Cube => CUBE,
        DemoKind::Matrix => MATRIX,
        DemoKind::JumpGame => JUMP_GAME,
        DemoKind::Gravity => GRAVITY,
        DemoKind::Snake => SNAKE,
        DemoKind::Wave => WAVE,
        DemoKind::Flappy => FLAPPY,
        DemoKind::Helix => HELIX,
    }
}

const PARTICLES: &str = "\
// A particle system with simple physics
struct Particle { x: f32, y: f32, vx: f32, vy: f32, life: f32 }

impl Particle {
    fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += 0.15; // gravity
        self.vx *= 0.99; // friction
        self.life -= 0.01;
    }
}

// An explosion of 50 particles in a ring
for i in 0..50 {
    let angle = TAU * i as f32 / 50.0;
    particles.push(Particle::burst(x, y, angle));
}";

const CUBE: &str = "\
// A 3D cube projected onto a 2D canvas
let vertices = [[-1, -1, -1], [1, -1, -1], /* ... */];

for [x, y, z] in vertices {
    // rotate around Y, then around X
    let (x, z) = (x * cos(ry) - z * sin(ry), x * sin(ry) + z * cos(ry));
    let (y, z) = (y * cos(rx) - z * sin(rx), y * sin(rx) + z * cos(rx));

    // perspective: far points shrink
    let scale = 200.0 / (200.0 + z * 50.0);
    project(cx + x * 80.0 * scale, cy + y * 80.0 * scale);
}

// paint faces from back to front
faces.sort_by(|a, b| a.depth.total_cmp(&b.depth));";

const MATRIX: &str = "\
// The digital rain from \"The Matrix\"
let chars = \"アイウエオ01\";
let mut drops = vec![0.0; width / 16];

fn draw() {
    fade(rgba(0, 0, 0, 0.05));

    for (i, drop) in drops.iter_mut().enumerate() {
        let ch = chars.random();
        fill_text(ch, i * 16, *drop * 16.0, GREEN);

        if *drop * 16.0 > height && random() > 0.975 {
            *drop = 0.0;
        }
        *drop += 1.0;
    }
}";

const JUMP_GAME: &str = "\
// A tiny platformer with a jump
let mut player = Player {
    x: 50.0,
    y: 250.0,
    velocity_y: 0.0,
    jumping: false,
};

fn jump(player: &mut Player) {
    if !player.jumping {
        player.velocity_y = -15.0;
        player.jumping = true;
    }
}

// gravity and landing
player.y += player.velocity_y;
player.velocity_y += 0.8;";

const GRAVITY: &str = "\
// Planets pulling on each other
const G: f32 = 0.5; // gravitational constant

for planet in &mut planets {
    let (mut fx, mut fy) = (0.0, 0.0);

    // sum the pull of every other planet
    for other in &others {
        let (dx, dy) = (other.x - planet.x, other.y - planet.y);
        let dist_sq = dx * dx + dy * dy;
        let dist = dist_sq.sqrt();

        let force = G * planet.mass * other.mass / dist_sq;
        fx += force * dx / dist;
        fy += force * dy / dist;
    }

    // update velocity, then position
    planet.vx += fx / planet.mass;
    planet.vy += fy / planet.mass;
    planet.x += planet.vx;
    planet.y += planet.vy;
}";

const SNAKE: &str = "\
// Classic snake
let mut snake = vec![(10, 10)];
let mut direction = Direction::Right;
let mut food = (15, 15);

fn tick() {
    let (dx, dy) = direction.delta();
    let head = (snake[0].0 + dx, snake[0].1 + dy);

    snake.insert(0, head);

    if head == food {
        score += 10;
        food = random_cell();
    } else {
        snake.pop();
    }
}";

const WAVE: &str = "\
// Waves from two sine curves
let mut time = 0.0;

fn draw_waves() {
    for x in 0..width {
        let y = center_y
            + (x as f32 * frequency / 100.0 + time).sin() * amplitude
            + (x as f32 * frequency / 50.0 + time * 2.0).sin() * amplitude / 2.0;

        line_to(x, y);
    }

    stroke(BLUE, 3.0);

    time += 0.05;
}";

const FLAPPY: &str = "\
// Flappy bird
let mut bird = Bird { y: 200.0, velocity: 0.0 };
let gravity = 0.18;
let jump_strength = -5.5;

fn game_loop() {
    // gravity pulls the bird down
    bird.velocity += gravity;
    bird.y += bird.velocity;

    for pipe in &mut pipes {
        pipe.x -= 2.0;

        // hit test against both pipe halves
        if overlaps(&bird, pipe) && !pipe.in_gap(&bird) {
            game_over();
        }
    }
}

fn flap() {
    bird.velocity = jump_strength;
}";

const HELIX: &str = "\
// A rotating DNA double helix
let pairs = 20;
let mut rotation = 0.0;

fn draw_dna() {
    for i in 0..pairs {
        let y = center_y - (pairs * spacing) / 2.0 + i * spacing;
        let angle = rotation + i * 0.3;

        // left strand (blue)
        let (x1, z1) = (cx + angle.cos() * radius, angle.sin() * radius);

        // right strand (pink), half a turn away
        let (x2, z2) = (cx - angle.cos() * radius, -angle.sin() * radius);

        draw_base_pair(x1, x2, y, z1, z2);
    }

    rotation += 0.02;
}";
