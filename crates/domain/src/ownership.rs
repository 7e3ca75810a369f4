use crate::DomainResult;
use crate::error::DomainError;
use crate::playlists::Playlist;

/// Entities that carry an owner reference and may only be mutated by that owner.
pub trait Owned {
    const KIND: &'static str;

    fn owner_id(&self) -> &str;
}

pub fn is_owner<T: Owned>(entity: &T, actor_id: &str) -> bool {
    entity.owner_id() == actor_id
}

pub fn assert_owner<T: Owned>(entity: &T, actor_id: &str) -> DomainResult<()> {
    if is_owner(entity, actor_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "only the owner may modify this {}",
            T::KIND
        )))
    }
}

pub fn assert_readable(playlist: &Playlist, actor_id: &str) -> DomainResult<()> {
    if playlist.is_public || is_owner(playlist, actor_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden("playlist is private".into()))
    }
}
