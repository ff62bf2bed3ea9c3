quantity!(Percent, "%");
