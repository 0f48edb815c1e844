use std::time::Instant;

use waygrid_core::{NavGrid, Point, Vec3};

use crate::finder::{NO_PARENT, Path, PathFinder, Route, SearchState};
use crate::simplify::simplify;
use crate::traits::AstarPather;

impl PathFinder {
    /// Compute the cheapest path from `from` to `to` using A*.
    ///
    /// Returns the full cell chain (including both endpoints) and its cost,
    /// or `None` if either endpoint is out of range or not passable, or if
    /// the goal cannot be reached. Costs saturate at `i32::MAX`.
    pub fn astar_path<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
    ) -> Option<Path> {
        self.state = SearchState::Running;
        let path = self.run_astar(pather, from, to);
        self.state = if path.is_some() {
            SearchState::Succeeded
        } else {
            SearchState::Failed
        };
        path
    }

    fn run_astar<P: AstarPather>(&mut self, pather: &P, from: Point, to: Point) -> Option<Path> {
        let start_idx = self.idx(from)?;
        let goal_idx = self.idx(to)?;
        if !pather.passable(from) || !pather.passable(to) {
            return None;
        }

        let cur_gen = self.next_generation();
        self.touch(start_idx, cur_gen);
        self.nodes[start_idx].h = pather.estimate(from, to);
        self.open.add(&mut self.nodes, start_idx);

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = loop {
            let Some(ci) = self.open.pop_best(&mut self.nodes) else {
                break false;
            };
            if ci == goal_idx {
                break true;
            }

            self.nodes[ci].closed = true;
            let current_g = self.nodes[ci].g;
            let current_point = self.point(ci);

            nbuf.clear();
            pather.neighbors(current_point, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                self.touch(ni, cur_gen);
                if self.nodes[ni].closed {
                    continue;
                }

                let tentative_g = current_g.saturating_add(pather.cost(current_point, np));
                let queued = self.open.contains(&self.nodes, ni);
                if queued && tentative_g >= self.nodes[ni].g {
                    continue;
                }

                let n = &mut self.nodes[ni];
                n.g = tentative_g;
                n.h = pather.estimate(np, to);
                n.parent = ci;

                if queued {
                    self.open.update_item(&mut self.nodes, ni);
                } else {
                    self.open.add(&mut self.nodes, ni);
                }
            }
        };

        self.nbuf = nbuf;

        if !found {
            return None;
        }

        let mut cells = Vec::new();
        let mut ci = goal_idx;
        while ci != NO_PARENT {
            cells.push(self.point(ci));
            ci = self.nodes[ci].parent;
        }
        cells.reverse();
        Some(Path {
            cells,
            cost: self.nodes[goal_idx].g,
        })
    }

    /// Find a route between two world positions on `grid`.
    ///
    /// Both positions snap to their nearest cell. Returns `None` when either
    /// cell is blocked or no path connects them.
    ///
    /// The finder must have been created for `grid` (see
    /// [`for_grid`](Self::for_grid)); debug builds assert this.
    pub fn find_path(&mut self, grid: &NavGrid, start: Vec3, end: Vec3) -> Option<Route> {
        debug_assert_eq!(
            self.rng,
            grid.range(),
            "PathFinder sized for a different grid"
        );
        let started = Instant::now();
        let from = grid.nearest_cell(start).pos;
        let to = grid.nearest_cell(end).pos;

        let Some(path) = self.astar_path(grid, from, to) else {
            if !grid.is_walkable(from) {
                log::debug!("no path {from} -> {to}: start cell is blocked");
            } else if !grid.is_walkable(to) {
                log::debug!("no path {from} -> {to}: goal cell is blocked");
            } else {
                log::debug!("no path {from} -> {to}: searched {:?}", started.elapsed());
            }
            return None;
        };

        let waypoints: Vec<Vec3> = simplify(&path.cells)
            .into_iter()
            .map(|p| grid.world_point(p))
            .collect();
        log::debug!(
            "path found in {:?}: {from} -> {to}, {} cells, {} waypoints, cost {}",
            started.elapsed(),
            path.cells.len(),
            waypoints.len(),
            path.cost
        );
        Some(Route { path, waypoints })
    }
}
