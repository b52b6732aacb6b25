mod model;

pub use model::DeadReckoningModel;

use crate::entity::EntityTable;
use crate::world::World;

/// Extrapolates every entity that received no update this frame, then clears
/// the per-frame update flags.
///
/// `dt` is wall-clock seconds since the previous frame. Entities updated this
/// frame keep the pose written by the dispatcher.
pub fn advance<W: World>(table: &mut EntityTable<W::Handle>, world: &mut W, dt: f64) -> usize {
    let mut moved = 0;

    for (_, entity) in table.iter_mut() {
        if !entity.updated_this_frame {
            let next = world
                .position(entity.handle)
                .and_then(|position| entity.extrapolate(position, dt));
            if let Some(position) = next {
                world.set_position(entity.handle, position);
                moved += 1;
            }
        }
        entity.updated_this_frame = false;
    }

    moved
}
