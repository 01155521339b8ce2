use crate::options::{Distance, Zone};
use anyhow::Result;
use zones::{reconcile, to_planar, zone_for};

impl Distance {
    pub fn run(&self) -> Result<()> {
        let (from, to) = (self.from.0, self.to.0);
        let reconciled = reconcile(from, to)?;
        println!("from zone:   {}", zone_for(from)?);
        println!("to zone:     {}", zone_for(to)?);
        println!("geodesic:    {:.3} m", reconciled.geodesic_m);
        match reconciled.planar_m {
            Some(planar_m) => println!("planar:      {planar_m:.3} m"),
            None => println!("planar:      n/a"),
        }
        println!("distance:    {:.3} m", reconciled.distance_m);
        println!("zone change: {}", reconciled.crossed_zone);
        Ok(())
    }
}

impl Zone {
    pub fn run(&self) -> Result<()> {
        let planar = to_planar(self.at.0)?;
        println!("zone:       {}", planar.zone.zone());
        println!("hemisphere: {}", planar.zone.hemisphere());
        println!("easting:    {:.3} m", planar.x);
        println!("northing:   {:.3} m", planar.y);
        Ok(())
    }
}
