use tracing::{info, warn};

use crate::fetch::SourceFetcher;
use crate::library::Library;
use crate::pool::{Player, normalize_rows};
use crate::pool_cache::PoolCache;
use crate::roster_csv::parse_csv;

pub const FALLBACK_CSV: &str = "full_name,position,seasons
Tom Brady,QB,2000-2022
Joe Montana,QB,1979-1994
Peyton Manning,QB,1998-2015
Dan Marino,QB,1983-1999
John Elway,QB,1983-1998
Brett Favre,QB,1991-2010
Patrick Mahomes,QB,2017-2023
Barry Sanders,RB,1989-1998
Emmitt Smith,RB,1990-2004
Walter Payton,RB,1975-1987
Marshall Faulk,RB,1994-2005
LaDainian Tomlinson,RB,2001-2011
Jerry Rice,WR,1985-2004
Randy Moss,WR,1998-2012
Calvin Johnson,WR,2007-2015
Larry Fitzgerald,WR,2004-2020
Andre Reed,WR,1985-2000
Tony Gonzalez,TE,1997-2013
Rob Gronkowski,TE,2010-2021
Jason Kelce,C,2011-2023
Dermontti Dawson,C,1988-2000
Anthony Munoz,T,1980-1992
Jonathan Ogden,T,1996-2007
Larry Allen,G,1994-2007
Randall McDaniel,G,1988-2002
Shannon Sharpe,TE,1990-2003
Deion Sanders,DB,1989-2005
Reggie White,DE,1985-2000
Junior Seau,LB,1990-2009";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Cached,
    Remote { source: String },
    Fallback { error: String },
}

#[derive(Debug, Clone)]
pub struct LoadResult {
    pub pool: Vec<Player>,
    pub origin: Origin,
}

impl LoadResult {
    pub fn is_cached(&self) -> bool {
        matches!(self.origin, Origin::Cached)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, Origin::Fallback { .. })
    }
}

/// Cache, then each candidate source in order, then the embedded roster.
/// Only pools that came from a real source are written back to the cache.
pub fn load_roster(library: &Library, cache: &PoolCache, fetcher: &SourceFetcher) -> LoadResult {
    if let Some(pool) = cache.read(&library.id) {
        info!(library = %library.id, players = pool.len(), "roster served from cache");
        return LoadResult {
            pool,
            origin: Origin::Cached,
        };
    }

    match fetcher.fetch_first_working(&library.urls, library.fetch) {
        Ok(fetched) => {
            let rows = parse_csv(&fetched.text);
            let pool = normalize_rows(&rows, library);
            cache.write(&library.id, &pool);
            LoadResult {
                pool,
                origin: Origin::Remote {
                    source: fetched.source,
                },
            }
        }
        Err(err) => {
            warn!(library = %library.id, error = %err, "library failed, using fallback");
            fallback_result(library, err.to_string())
        }
    }
}

pub fn fallback_pool(library: &Library) -> Vec<Player> {
    normalize_rows(&parse_csv(FALLBACK_CSV), library)
}

fn fallback_result(library: &Library, error: String) -> LoadResult {
    LoadResult {
        pool: fallback_pool(library),
        origin: Origin::Fallback { error },
    }
}
