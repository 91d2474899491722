/// Read-through caching over an `Option<Cache>`.
///
/// With a cache configured, a hit is returned directly; on a miss the block is
/// awaited, its `Ok` value is queued for a background write and then returned.
/// Without a cache the block is simply awaited. Errors from the block propagate
/// through `?` into the enclosing function.
///
/// # Arguments
/// * `$cache`: an `&Option<Cache>`.
/// * `$key`: the `CacheKey` for the value.
/// * `$ttl`: time-to-live for the cached value in seconds.
/// * `$block`: the future computing the value on a miss.
///
/// # Example
/// ```rust,ignore
/// let movie: TmdbMovie = cached!(&self.cache, CacheKey::Movie(id), MOVIE_CACHE_TTL, async {
///     self.get_json(&path, &[]).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache {
            Some(cache) => {
                let key = $key;
                if let Some(hit) = cache.get_from_cache(&key).await {
                    Ok(hit)
                } else {
                    match $block.await {
                        Ok(value) => {
                            cache.set_in_background(&key, &value, $ttl);
                            Ok(value)
                        }
                        Err(e) => Err(e),
                    }
                }
            }
            None => $block.await,
        }
    }};
}
