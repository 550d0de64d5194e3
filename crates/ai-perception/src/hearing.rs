//! Audibility of a noise for one listener.

use ai_core::Vec3;

use crate::PerceptionQuery;

/// Share of the noise radius that still carries through a wall.
pub const WALL_ATTENUATION: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hearing {
    /// In range with nothing in between.
    Clear,
    /// Through a wall, but within the attenuated radius.
    Muffled,
    Inaudible,
}

impl Hearing {
    pub fn is_audible(self) -> bool {
        !matches!(self, Hearing::Inaudible)
    }
}

/// Classify a noise of `radius` emitted at `source`, heard from `listener`.
///
/// A silent source (`radius <= 0`) is never heard.
pub fn audible(listener: Vec3, source: Vec3, radius: f32, wall: bool, attenuation: f32) -> Hearing {
    if !(radius > 0.0) {
        return Hearing::Inaudible;
    }
    let distance = listener.distance(source);
    if !wall {
        if distance <= radius {
            Hearing::Clear
        } else {
            Hearing::Inaudible
        }
    } else if distance <= radius * attenuation {
        Hearing::Muffled
    } else {
        Hearing::Inaudible
    }
}

/// [`audible`] with the wall test answered by the world's occlusion cast.
pub fn hear<Q>(query: &Q, listener: Vec3, source: Vec3, radius: f32, attenuation: f32) -> Hearing
where
    Q: PerceptionQuery + ?Sized,
{
    let wall = query.linecast(listener, source).is_some();
    audible(listener, source, radius, wall, attenuation)
}
